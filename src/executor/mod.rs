//! HTTP request executor.
//!
//! A [`Transport`] takes a fully resolved [`RequestDocument`] and returns a
//! normalized [`StepResult`]. The orchestrator only ever talks to this
//! trait, so tests swap the network for a recording fake.

pub mod config;
pub mod error;
pub mod native;

pub use config::ExecutionConfig;
pub use error::TransportError;
pub use native::ReqwestTransport;

use crate::models::{RequestDocument, StepResult};
use async_trait::async_trait;

/// Sends a resolved request and normalizes the response.
///
/// Implementations must be shareable across concurrent flow branches.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDocument) -> Result<StepResult, TransportError>;
}
