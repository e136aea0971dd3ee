//! Error types for configuration and scene loading.

use core::fmt;
use std::path::PathBuf;

/// Errors that can occur while loading or saving configuration and scenes.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    Io { path: PathBuf, source: std::io::Error },
    /// The INI file could not be parsed or written.
    Ini { path: PathBuf, message: String },
    /// The scene JSON is malformed.
    Scene { path: PathBuf, source: serde_json::Error },
    /// A value was present but out of range.
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot access {}: {}", path.display(), source)
            }
            ConfigError::Ini { path, message } => {
                write!(f, "bad config file {}: {}", path.display(), message)
            }
            ConfigError::Scene { path, source } => {
                write!(f, "bad scene file {}: {}", path.display(), source)
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value '{}' for '{}'", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Scene { source, .. } => Some(source),
            _ => None,
        }
    }
}
