//! Data models for request documents and their responses.
//!
//! This module contains the core data structures shared by the parser, the
//! variable resolver, the transports and the flow orchestrator.

pub mod request;
pub mod response;

pub use request::{Body, HttpMethod, HttpVersion, RequestDocument};
pub use response::StepResult;
