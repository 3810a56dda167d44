//! HTTP request execution error types.
//!
//! This module defines error types that can occur while sending a resolved
//! request, including network errors, timeouts, and invalid URLs. None of
//! them are retried.

use thiserror::Error;

/// Errors that can occur during HTTP request execution.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network error occurred during request execution.
    ///
    /// This includes connection failures, DNS resolution errors,
    /// and other network-level issues.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out before completion.
    #[error("Request timed out")]
    Timeout,

    /// The resolved URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// TLS/SSL error occurred during HTTPS connection.
    #[error("TLS/SSL error: {0}")]
    TlsError(String),

    /// The request could not be built from the resolved document, e.g. an
    /// illegal header name or value.
    #[error("Request build error: {0}")]
    BuildError(String),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    BodyError(String),
}

/// Convert reqwest errors to TransportError.
///
/// Maps reqwest's error types to our own variants for consistent error
/// handling throughout the application.
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_builder() {
            TransportError::BuildError(message)
        } else if err.is_body() || err.is_decode() {
            TransportError::BodyError(message)
        } else if message.contains("certificate") || message.contains("TLS") || message.contains("SSL") {
            TransportError::TlsError(message)
        } else {
            TransportError::NetworkError(message)
        }
    }
}
