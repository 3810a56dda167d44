//! Document resolution: applies merged variable layers to a parsed request.

use super::layer::{merge_layers, VariableLayer};
use super::substitution::{substitute, Encoding};
use crate::models::{Body, HttpMethod, RequestDocument};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A non-fatal diagnostic raised while resolving a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The document carried a body its method cannot send; it was dropped.
    BodyIgnored { method: HttpMethod },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::BodyIgnored { method } => write!(f, "Note: body ignored for {} request", method),
        }
    }
}

/// A resolved document ready to send, plus any notices raised on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub document: RequestDocument,
    pub notices: Vec<Notice>,
}

/// Resolves every template token in `document` against `layers`.
///
/// Layers are merged left to right, later layers overriding earlier ones.
/// URL substitutions are percent-encoded as URI components; header and body
/// substitutions are inserted verbatim. GET and HEAD documents lose their
/// body before any substitution runs.
///
/// The input document is left untouched.
///
/// # Examples
///
/// ```
/// use req::parser::parse_document;
/// use req::variables::{resolve_document, VariableLayer};
///
/// let doc = parse_document("GET https://example.com/users?page={page|1} HTTP/1.1").unwrap();
/// let config: VariableLayer = [("page", "1")].into_iter().collect();
/// let flags: VariableLayer = [("page", "2")].into_iter().collect();
///
/// let resolved = resolve_document(&doc, &[&config, &flags]);
/// assert_eq!(resolved.document.url, "https://example.com/users?page=2");
/// ```
pub fn resolve_document(document: &RequestDocument, layers: &[&VariableLayer]) -> Resolution {
    let mut notices = Vec::new();
    let mut body = document.body.as_ref();

    if document.method.forbids_body() && body.is_some() {
        let notice = Notice::BodyIgnored {
            method: document.method,
        };
        log::debug!("{}", notice);
        notices.push(notice);
        body = None;
    }

    let variables = merge_layers(layers);

    let resolved = RequestDocument {
        method: document.method,
        url: substitute(&document.url, &variables, Encoding::UriComponent),
        version: document.version,
        headers: document
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.clone(),
                    substitute(value, &variables, Encoding::Verbatim),
                )
            })
            .collect(),
        body: body.map(|body| resolve_body(body, &variables)),
    };

    Resolution {
        document: resolved,
        notices,
    }
}

fn resolve_body(body: &Body, variables: &HashMap<String, String>) -> Body {
    match body {
        Body::Raw(text) => Body::Raw(substitute(text, variables, Encoding::Verbatim)),
        Body::Json(value) => Body::Json(resolve_json(value, variables)),
    }
}

/// Substitutes tokens inside every string value of a JSON tree. Object keys
/// are left as written.
fn resolve_json(value: &Value, variables: &HashMap<String, String>) -> Value {
    match value {
        Value::String(s) => Value::String(substitute(s, variables, Encoding::Verbatim)),
        Value::Array(items) => Value::Array(items.iter().map(|v| resolve_json(v, variables)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), resolve_json(v, variables)))
                .collect(),
        ),
        other => other.clone(),
    }
}
