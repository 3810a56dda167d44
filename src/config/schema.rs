//! Configuration schema for req.
//!
//! This module defines the settings read from the `[settings]` section of
//! `.reqrc` and their validation.

use super::ConfigError;
use crate::variables::VariableLayer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Client settings from the `[settings]` section.
///
/// Missing keys fall back to defaults; present keys must parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Request timeout in seconds.
    ///
    /// Maximum time to wait for a complete response. Defaults to 30 seconds.
    /// Must be greater than 0.
    pub timeout: u64,

    /// Whether to automatically follow HTTP redirects. Defaults to true.
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow. Defaults to 10.
    pub max_redirects: usize,

    /// Whether to validate TLS certificates. Defaults to true.
    pub validate_ssl: bool,

    /// User-Agent sent when a document does not set one.
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout: 30,
            follow_redirects: true,
            max_redirects: 10,
            validate_ssl: true,
            user_agent: format!("req/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Settings {
    /// Builds settings from a `[settings]` section.
    pub fn from_section(section: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();

        for (key, value) in section {
            match key.as_str() {
                "timeout" => settings.timeout = parse_value(key, value, "a number of seconds")?,
                "follow-redirects" => {
                    settings.follow_redirects = parse_value(key, value, "true or false")?
                }
                "max-redirects" => settings.max_redirects = parse_value(key, value, "a number")?,
                "validate-ssl" => settings.validate_ssl = parse_value(key, value, "true or false")?,
                "user-agent" => settings.user_agent = value.clone(),
                other => log::warn!("Ignoring unknown setting '{}' in .reqrc", other),
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validates the settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout == 0 {
            return Err(ConfigError::InvalidSetting {
                key: "timeout".to_string(),
                value: "0".to_string(),
                expected: "a number of seconds greater than 0",
            });
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(
    key: &str,
    value: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    })
}

/// Everything `.reqrc` contributes to a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReqConfig {
    /// The `[variables]` section, the lowest-precedence variable layer.
    pub variables: VariableLayer,

    /// The `[settings]` section.
    pub settings: Settings,
}
