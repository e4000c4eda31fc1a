//! Config path resolution
//!
//! The base directory is taken from `MIRAGE_HOME` when set, otherwise it is
//! the directory holding the host executable.

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// Environment variable overriding the base directory
pub const HOME_VAR: &str = "MIRAGE_HOME";

/// Returns the mirage base directory.
///
/// `$MIRAGE_HOME` if set and non-empty, else `<exe dir>/mirage/`.
pub fn mirage_base_dir() -> ConfigResult<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_VAR).filter(|home| !home.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    let exe = std::env::current_exe()?;
    exe.parent()
        .map(|dir| dir.join("mirage"))
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the configs directory: `<base>/configs/`
pub fn configs_dir() -> ConfigResult<PathBuf> {
    Ok(mirage_base_dir()?.join("configs"))
}

/// Returns the core config path: `<base>/configs/core.toml`
pub fn core_config_path() -> ConfigResult<PathBuf> {
    Ok(configs_dir()?.join("core.toml"))
}
