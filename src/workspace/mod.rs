//! Project workspace: where request documents and flows live.
//!
//! A project root holds `.reqrc` and a `.req/` directory. Targets are looked
//! up by bare name: `.req/<name>.http` first, then `.req/<name>.flow`.

mod scaffold;

pub use scaffold::{init, InitError};

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::CONFIG_FILE;

/// Directory holding request documents and flows.
pub const REQ_DIR: &str = ".req";

/// File suffix of request documents.
pub const REQUEST_SUFFIX: &str = "http";

/// File suffix of flow scripts.
pub const FLOW_SUFFIX: &str = "flow";

/// Errors raised while resolving a target name.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Request {name} not found!")]
    NotFound {
        name: String,
        /// Available names similar to the requested one.
        suggestions: Vec<String>,
    },

    #[error("Invalid target name '{name}': names may not contain path separators")]
    InvalidName { name: String },

    #[error("req has not been initialized in {}. Run `req init` to initialize.", root.display())]
    NotInitialized { root: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The kind and source text of a resolved target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A request document (`.http`).
    Request { name: String, source: String },
    /// A flow script (`.flow`).
    Flow { name: String, source: String },
}

impl Target {
    pub fn name(&self) -> &str {
        match self {
            Target::Request { name, .. } | Target::Flow { name, .. } => name,
        }
    }
}

/// Resolves target names to their source text.
///
/// Implementations must prefer a request document over a flow of the same
/// name.
pub trait Catalog: Send + Sync {
    fn lookup(&self, name: &str) -> Result<Target, LookupError>;
}

/// A project directory on disk.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Opens the project at `root`, which must have been initialized.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, LookupError> {
        let root = root.into();
        if !root.join(CONFIG_FILE).is_file() || !root.join(REQ_DIR).is_dir() {
            return Err(LookupError::NotInitialized { root });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn request_dir(&self) -> PathBuf {
        self.root.join(REQ_DIR)
    }

    /// Lists every request and flow name, sorted and deduplicated.
    pub fn names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.request_dir()) else {
            return Vec::new();
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                let suffix = path.extension()?.to_str()?;
                if suffix != REQUEST_SUFFIX && suffix != FLOW_SUFFIX {
                    return None;
                }
                let file_name = path.file_name()?.to_str()?;
                file_name.split('.').next().map(str::to_string)
            })
            .filter(|name| !name.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn read(&self, path: &Path) -> Result<String, LookupError> {
        std::fs::read_to_string(path).map_err(|source| LookupError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Catalog for Workspace {
    fn lookup(&self, name: &str) -> Result<Target, LookupError> {
        validate_name(name)?;

        let request_path = self.request_dir().join(format!("{}.{}", name, REQUEST_SUFFIX));
        if request_path.is_file() {
            return Ok(Target::Request {
                name: name.to_string(),
                source: self.read(&request_path)?,
            });
        }

        let flow_path = self.request_dir().join(format!("{}.{}", name, FLOW_SUFFIX));
        if flow_path.is_file() {
            return Ok(Target::Flow {
                name: name.to_string(),
                source: self.read(&flow_path)?,
            });
        }

        Err(LookupError::NotFound {
            name: name.to_string(),
            suggestions: suggest(name, &self.names()),
        })
    }
}

/// An in-memory catalog, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    requests: HashMap<String, String>,
    flows: HashMap<String, String>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request(mut self, name: &str, source: &str) -> Self {
        self.requests.insert(name.to_string(), source.to_string());
        self
    }

    pub fn with_flow(mut self, name: &str, source: &str) -> Self {
        self.flows.insert(name.to_string(), source.to_string());
        self
    }

    fn names(&self) -> Vec<String> {
        self.requests
            .keys()
            .chain(self.flows.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Catalog for MemoryCatalog {
    fn lookup(&self, name: &str) -> Result<Target, LookupError> {
        if let Some(source) = self.requests.get(name) {
            return Ok(Target::Request {
                name: name.to_string(),
                source: source.clone(),
            });
        }
        if let Some(source) = self.flows.get(name) {
            return Ok(Target::Flow {
                name: name.to_string(),
                source: source.clone(),
            });
        }
        Err(LookupError::NotFound {
            name: name.to_string(),
            suggestions: suggest(name, &self.names()),
        })
    }
}

/// Rejects names that could reach outside the request directory.
fn validate_name(name: &str) -> Result<(), LookupError> {
    let invalid = name.is_empty()
        || name.contains(['/', '\\'])
        || name == ".."
        || name.starts_with('.');
    if invalid {
        return Err(LookupError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Minimum Jaro-Winkler similarity for a name to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.9;

/// Ranks the available names by similarity to `name`, ignoring case. A name
/// that contains `name`, or is contained in it, always qualifies.
pub fn suggest(name: &str, available: &[String]) -> Vec<String> {
    let wanted = name.to_lowercase();
    let mut scored: Vec<(f64, &String)> = available
        .iter()
        .filter_map(|candidate| {
            let lowered = candidate.to_lowercase();
            let score = if lowered.contains(&wanted) || wanted.contains(&lowered) {
                1.0
            } else {
                strsim::jaro_winkler(&wanted, &lowered)
            };
            (score >= SUGGESTION_THRESHOLD).then_some((score, candidate))
        })
        .collect();

    // Best first; ties keep the catalog order
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, candidate)| candidate.clone()).collect()
}
