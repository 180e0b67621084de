//! Board configuration loading.
//!
//! # Responsibility
//! - Define the JSON configuration shape shared by CLI and host adapters.
//! - Provide defaults for every field so an empty object is valid.
//!
//! # Invariants
//! - Unknown fields are rejected to surface typos early.
//! - Loading never mutates process state (logging is initialized by callers).

use crate::logging::default_log_level;
use crate::parser::frontmatter::DEFAULT_GATE_KEY;
use crate::parser::policy::ExtractPolicy;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Frontmatter gate settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// When `false`, every document renders as a board.
    pub enabled: bool,
    /// Frontmatter key that must be boolean `true`.
    pub key: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key: DEFAULT_GATE_KEY.to_string(),
        }
    }
}

/// Logging settings consumed by `crate::logging::init_logging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute log directory; file logging stays off when unset.
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    pub policy: ExtractPolicy,
    pub gate: GateConfig,
    pub logging: LoggingConfig,
}

impl BoardConfig {
    /// Parses configuration from JSON text.
    pub fn from_json_str(value: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(value).map_err(ConfigError::Parse)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    /// - `Io` when the file cannot be read.
    /// - `Parse` when the content is not a valid configuration document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

/// Configuration load errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}
