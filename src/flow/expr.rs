//! Reference expressions inside flow scripts.
//!
//! `${root.seg.seg}` reads from a bound step result, or from `vars` for the
//! flow's effective variables. A string that is exactly one expression takes
//! the referenced JSON value; expressions embedded in longer strings are
//! interpolated as text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Root name under which a flow sees its effective variables.
pub const VARS_ROOT: &str = "vars";

static REFERENCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]*)\}").expect("Failed to compile reference regex"));

static EXACT_REFERENCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$\{([^}]*)\}$").expect("Failed to compile reference regex"));

static ROOT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w+$").expect("Failed to compile root regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("malformed reference '${{{expression}}}'")]
    Malformed { expression: String },

    #[error("'{root}' is not bound in '${{{expression}}}'")]
    Unbound { root: String, expression: String },

    #[error("'${{{expression}}}' does not resolve to a value")]
    MissingPath { expression: String },
}

/// Values visible to reference expressions while a flow runs.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: HashMap<String, Value>,
}

impl Scope {
    /// Creates a scope exposing `vars` under the reserved root.
    pub fn new<'a>(vars: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        let vars: Map<String, Value> = vars
            .into_iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect();

        let mut bindings = HashMap::new();
        bindings.insert(VARS_ROOT.to_string(), Value::Object(vars));
        Self { bindings }
    }

    /// Binds a step result; a later binding of the same name replaces it.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Evaluates the inside of one `${...}`.
    pub fn evaluate(&self, expression: &str) -> Result<&Value, ReferenceError> {
        let mut segments = expression.trim().split('.');

        let root = segments.next().unwrap_or_default().trim();
        if !ROOT_REGEX.is_match(root) {
            return Err(ReferenceError::Malformed {
                expression: expression.to_string(),
            });
        }

        let mut current = self.bindings.get(root).ok_or_else(|| ReferenceError::Unbound {
            root: root.to_string(),
            expression: expression.to_string(),
        })?;

        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(ReferenceError::Malformed {
                    expression: expression.to_string(),
                });
            }

            let next = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };

            current = next.ok_or_else(|| ReferenceError::MissingPath {
                expression: expression.to_string(),
            })?;
        }

        Ok(current)
    }

    /// Renders a template value, resolving every reference in its strings.
    pub fn render(&self, template: &Value) -> Result<Value, ReferenceError> {
        match template {
            Value::String(text) => {
                if let Some(caps) = EXACT_REFERENCE_REGEX.captures(text) {
                    return self.evaluate(&caps[1]).cloned();
                }
                self.interpolate(text).map(Value::String)
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.render(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| Ok::<_, ReferenceError>((key.clone(), self.render(value)?)))
                .collect::<Result<Map<_, _>, _>>()
                .map(Value::Object),
            other => Ok(other.clone()),
        }
    }

    /// Renders a template value down to the text a variable layer holds.
    pub fn render_text(&self, template: &Value) -> Result<String, ReferenceError> {
        self.render(template).map(|value| to_text(&value))
    }

    fn interpolate(&self, text: &str) -> Result<String, ReferenceError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in REFERENCE_REGEX.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            out.push_str(&text[last..whole.start()]);
            out.push_str(&to_text(self.evaluate(&caps[1])?));
            last = whole.end();
        }

        out.push_str(&text[last..]);
        Ok(out)
    }
}

/// Strings are taken verbatim; everything else as compact JSON.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
