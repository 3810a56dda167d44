//! Normalized response model.
//!
//! Every transport hands back a `StepResult`: status, headers and a body
//! already sniffed into JSON or raw text. Flows bind these results by name.

use super::request::Body;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The normalized outcome of sending one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// HTTP status code (e.g., 200, 404, 500).
    pub status: u16,

    /// Response headers in the order the server sent them.
    pub headers: IndexMap<String, String>,

    /// Response body, parsed as JSON when it is valid JSON.
    pub body: Body,
}

impl StepResult {
    /// Creates a result with no headers and an empty raw body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: IndexMap::new(),
            body: Body::Raw(String::new()),
        }
    }

    /// Classifies response text the same way request bodies are classified:
    /// JSON when it parses, raw text otherwise.
    pub fn sniff_body(text: String) -> Body {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Raw(text),
        }
    }

    /// Returns the canonical reason phrase for the status, if one exists.
    pub fn status_text(&self) -> &'static str {
        reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
    }

    /// Checks if the response indicates success (2xx status code).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Gets the Content-Type header value, matched case-insensitively.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
    }

    /// Converts the result into the JSON shape flows bind and reference:
    /// `{"status": ..., "headers": {...}, "body": ...}`.
    pub fn to_value(&self) -> Value {
        json!({
            "status": self.status,
            "headers": self.headers,
            "body": self.body.to_value(),
        })
    }
}
