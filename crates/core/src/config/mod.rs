//! Configuration for the registry
//!
//! Settings are read from a TOML file. Missing keys fall back to their
//! defaults, and a default file is written on first load.
//!
//! # Example
//!
//! ```ignore
//! use cvarkit_core::config::{config_path, RegistryConfig};
//! use cvarkit_core::Registry;
//!
//! let config = RegistryConfig::load_or_default(&config_path()?)?;
//! let registry = Registry::new(config);
//! ```

mod loader;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use loader::{config_path, CONFIG_ENV_VAR, CONFIG_FILE_NAME};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Could not determine config directory from the executable location
    #[error("Config directory not available - could not resolve executable path")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Slot count for per-user variables
    pub max_split_screen_slots: usize,

    /// Extra flag bits OR-ed into every non-reference registration
    pub registration_flags: u64,

    /// Mark entries without a release-visible flag as defensive dev-only
    pub sanitize_flags: bool,

    /// Capacity of the cross-thread set queue
    pub queued_set_capacity: usize,

    /// Single-character break set used when tokenizing console lines
    pub break_set: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            max_split_screen_slots: 1,
            registration_flags: 0,
            sanitize_flags: false,
            queued_set_capacity: 1024,
            break_set: crate::commands::DEFAULT_BREAK_SET.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from a file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded registry config from {:?}", path);
        Ok(config)
    }

    /// Load config from a file, creating default if missing.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let default = Self::default();
            default.save(path)?;
            tracing::info!("Created default registry config at {:?}", path);
            Ok(default)
        }
    }

    /// Save config to file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved registry config to {:?}", path);
        Ok(())
    }

    /// Reload config from file.
    pub fn reload(&mut self, path: &Path) -> ConfigResult<()> {
        *self = Self::load(path)?;
        tracing::debug!("Reloaded registry config from {:?}", path);
        Ok(())
    }
}
