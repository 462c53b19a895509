//! Runtime configuration
//!
//! Behaviour switches for the component runtime, read from a `stanza.toml`:
//!
//! ```toml
//! # Warn when a component asks for its root with different arguments, or
//! # updates without ever having rendered through a root
//! dev_warnings = true
//!
//! # Warn when a component emits widgets while no container is active
//! warn_on_orphans = false
//! ```
//!
//! The configuration is installed once per process; until then
//! [`RuntimeConfig::current`] returns the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up by [`RuntimeConfig::load_from_dir`]
pub const CONFIG_FILE: &str = "stanza.toml";

static RUNTIME_CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

/// Errors loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("runtime configuration is already installed")]
    AlreadyInstalled,
}

/// Component runtime configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Development-mode warnings (root argument mismatches, rootless updates)
    pub dev_warnings: bool,
    /// Warn when widgets are emitted with no active container
    pub warn_on_orphans: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            dev_warnings: cfg!(debug_assertions),
            warn_on_orphans: false,
        }
    }
}

impl RuntimeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `stanza.toml` from a directory, falling back to defaults when the
    /// file does not exist
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no runtime config, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Install this configuration for the rest of the process
    pub fn install(self) -> Result<(), ConfigError> {
        RUNTIME_CONFIG
            .set(self)
            .map_err(|_| ConfigError::AlreadyInstalled)
    }

    /// The installed configuration, or the defaults
    pub fn current() -> &'static RuntimeConfig {
        RUNTIME_CONFIG.get_or_init(RuntimeConfig::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let config = RuntimeConfig::from_toml_str("warn_on_orphans = true").unwrap();
        assert!(config.warn_on_orphans);
        assert_eq!(config.dev_warnings, cfg!(debug_assertions));
    }

    #[test]
    fn test_parse_error_reported() {
        let err = RuntimeConfig::from_toml_str("dev_warnings = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = RuntimeConfig {
            dev_warnings: false,
            warn_on_orphans: true,
        };
        let text = config.to_toml().unwrap();
        assert_eq!(RuntimeConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = std::env::temp_dir().join("stanza-config-test-missing");
        let config = RuntimeConfig::load_from_dir(&dir).unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }
}
