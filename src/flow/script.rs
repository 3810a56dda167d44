//! Flow script definitions.
//!
//! A flow is a YAML document with an ordered list of steps and an optional
//! `complete` value:
//!
//! ```yaml
//! steps:
//!   - invoke: register
//!     overlay:
//!       email: neo@zion.io
//!     bindResultAs: registered
//!   - parallel:
//!       - invoke: profile
//!         overlay:
//!           token: "${registered.body.token}"
//!         bindResultAs: profile
//!       - invoke: settings
//! complete: "${profile.body}"
//! ```

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::expr::VARS_ROOT;

static BINDING_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w+$").expect("Failed to compile binding name regex"));

/// Errors in the shape of a flow script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("invalid flow YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("step {index}: {message}")]
    InvalidStep { index: usize, message: String },
}

/// A parsed flow script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowScript {
    /// Steps, run in order.
    #[serde(default)]
    pub steps: Vec<Step>,

    /// The value handed back to whoever ran the flow. Strings may reference
    /// bound results; `null` when absent.
    #[serde(default)]
    pub complete: Option<Value>,
}

/// One step of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    /// Invoke one target and wait for it.
    Invoke(InvokeStep),
    /// Invoke every branch at once and wait for all of them.
    Parallel(ParallelStep),
}

/// Branches issued together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParallelStep {
    pub parallel: Vec<InvokeStep>,
}

/// A single invocation of a request or flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct InvokeStep {
    /// Name of the request document or flow to run.
    pub invoke: String,

    /// Variables layered over the flow's own for this call.
    #[serde(default)]
    pub overlay: IndexMap<String, Value>,

    /// Name under which later steps can reference the result.
    #[serde(default, alias = "bind")]
    pub bind_result_as: Option<String>,
}

impl InvokeStep {
    pub fn new(target: &str) -> Self {
        Self {
            invoke: target.to_string(),
            overlay: IndexMap::new(),
            bind_result_as: None,
        }
    }

    pub fn with_overlay<V: Into<Value>>(mut self, name: &str, value: V) -> Self {
        self.overlay.insert(name.to_string(), value.into());
        self
    }

    pub fn bind(mut self, name: &str) -> Self {
        self.bind_result_as = Some(name.to_string());
        self
    }
}

impl FlowScript {
    /// Parses and validates flow YAML.
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        // An empty file is a flow that does nothing
        let script: FlowScript = if source.trim().is_empty() {
            FlowScript {
                steps: Vec::new(),
                complete: None,
            }
        } else {
            serde_yaml::from_str(source)?
        };

        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<(), ScriptError> {
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                Step::Invoke(invoke) => validate_invoke(index, invoke)?,
                Step::Parallel(ParallelStep { parallel }) => {
                    if parallel.is_empty() {
                        return Err(ScriptError::InvalidStep {
                            index,
                            message: "parallel group has no branches".to_string(),
                        });
                    }
                    for invoke in parallel {
                        validate_invoke(index, invoke)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn validate_invoke(index: usize, step: &InvokeStep) -> Result<(), ScriptError> {
    if step.invoke.trim().is_empty() {
        return Err(ScriptError::InvalidStep {
            index,
            message: "invoke target is empty".to_string(),
        });
    }

    if let Some(name) = &step.bind_result_as {
        if name == VARS_ROOT || !BINDING_NAME_REGEX.is_match(name) {
            return Err(ScriptError::InvalidStep {
                index,
                message: format!("'{}' cannot be used as a binding name", name),
            });
        }
    }

    Ok(())
}
