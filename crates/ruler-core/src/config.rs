//! Ruler configuration (`ruler.toml`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default base directory for rule files, and thus for group keys.
pub const DEFAULT_RULE_PATH: &str = "./data-ruler/";

/// Errors raised while loading or validating a ruler configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulerConfig {
    /// Directory the evaluation engine writes rule files under. Group
    /// keys are derived from it.
    pub rule_path: PathBuf,
    /// Keep an in-memory copy of every tenant's rule groups.
    pub enable_rules_backup: bool,
    /// Optional prefix for exported metric names (e.g. `cortex`).
    pub metrics_namespace: Option<String>,
}

impl Default for RulerConfig {
    fn default() -> Self {
        Self {
            rule_path: PathBuf::from(DEFAULT_RULE_PATH),
            enable_rules_backup: false,
            metrics_namespace: None,
        }
    }
}

impl RulerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RulerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rule_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("rule_path must not be empty".into()));
        }
        if let Some(ns) = &self.metrics_namespace {
            if !is_metric_name_fragment(ns) {
                return Err(ConfigError::Invalid(format!(
                    "metrics_namespace {ns:?} is not a valid metric name prefix"
                )));
            }
        }
        Ok(())
    }
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`
fn is_metric_name_fragment(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
