//! Variable layers and their precedence merge.
//!
//! Three layers feed a resolution, lowest precedence first: the `[variables]`
//! section of `.reqrc`, `--name=value` flags given on the command line, and
//! the overlay a flow passes when it invokes a target.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A flat name to value mapping contributing to variable resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableLayer {
    values: HashMap<String, String>,
}

impl VariableLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.values.iter()
    }

    /// Returns a new layer holding `self` overridden by `other`.
    ///
    /// Neither input is modified.
    pub fn merged_with(&self, other: &VariableLayer) -> VariableLayer {
        let mut values = self.values.clone();
        values.extend(other.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        VariableLayer { values }
    }
}

impl From<HashMap<String, String>> for VariableLayer {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableLayer {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Merges layers left to right into one mapping; later layers win on collision.
///
/// A fresh mapping is built on every call, so callers sharing layers across
/// concurrent resolutions never observe each other's merges.
pub fn merge_layers(layers: &[&VariableLayer]) -> HashMap<String, String> {
    let mut combined = HashMap::new();
    for layer in layers {
        for (name, value) in layer.iter() {
            combined.insert(name.clone(), value.clone());
        }
    }
    combined
}
