//! Config path resolution
//!
//! Handles resolving the config file path from the environment or the
//! running executable's location.

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// Environment variable overriding the config file path
pub const CONFIG_ENV_VAR: &str = "CVARKIT_CONFIG";

/// File name used beside the executable
pub const CONFIG_FILE_NAME: &str = "cvarkit.toml";

/// Returns the config file path.
///
/// Uses `$CVARKIT_CONFIG` when set, otherwise `cvarkit.toml` in the
/// directory holding the running executable.
pub fn config_path() -> ConfigResult<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;
    exe.parent()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoConfigDirectory)
}
