//! Configuration loading for req.
//!
//! A project keeps its configuration in `.reqrc` next to the `.req/`
//! directory. The `[variables]` section becomes the lowest-precedence
//! variable layer and `[settings]` tunes the HTTP client. The loaded
//! [`ReqConfig`] is passed explicitly to whatever needs it; there is no
//! process-wide configuration state.

pub mod ini;
pub mod schema;

pub use schema::{ReqConfig, Settings};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file at the project root.
pub const CONFIG_FILE: &str = ".reqrc";

/// Errors raised while loading `.reqrc`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value '{value}' for setting '{key}': expected {expected}")]
    InvalidSetting {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Parses the text of a `.reqrc` file.
///
/// # Example
///
/// ```
/// use req::config::parse_config;
///
/// let config = parse_config("[variables]\nhost = reqres.in\n\n[settings]\ntimeout = 5\n").unwrap();
/// assert_eq!(config.variables.get("host"), Some("reqres.in"));
/// assert_eq!(config.settings.timeout, 5);
/// ```
pub fn parse_config(content: &str) -> Result<ReqConfig, ConfigError> {
    let mut sections = ini::parse_sections(content);

    let variables = sections.remove("variables").unwrap_or_default().into();
    let settings = match sections.get("settings") {
        Some(section) => Settings::from_section(section)?,
        None => Settings::default(),
    };

    Ok(ReqConfig {
        variables,
        settings,
    })
}

/// Loads `.reqrc` from the project root.
pub fn load_config(root: &Path) -> Result<ReqConfig, ConfigError> {
    let path = root.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    let config = parse_config(&content)?;
    log::debug!(
        "Loaded {} ({} variables)",
        path.display(),
        config.variables.len()
    );
    Ok(config)
}
