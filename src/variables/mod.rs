//! Variables module for req
//!
//! This module provides variable resolution for request documents: layered
//! variable sources, template token substitution, and whole-document
//! resolution.

pub mod layer;
pub mod resolve;
pub mod substitution;

pub use layer::{merge_layers, VariableLayer};
pub use resolve::{resolve_document, Notice, Resolution};
pub use substitution::{substitute, Encoding};
