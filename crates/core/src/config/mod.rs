//! Configuration
//!
//! `core.toml` holds the framework settings, including the resolution cache
//! tuning knobs. Missing keys fall back to their defaults, so older files keep
//! loading after new settings are added.
//!
//! # Example
//!
//! ```ignore
//! use mirage_core::config::CoreConfig;
//!
//! let config = CoreConfig::load().unwrap_or_default();
//! if config.debug {
//!     tracing::debug!("Compacting every {} frames", config.resolver.compaction_interval_frames);
//! }
//! ```
//!
//! ```toml
//! version = 1
//! debug = false
//!
//! [resolver]
//! cache_identified = true
//! compaction_interval_frames = 600
//! slow_frame_warn_us = 1000
//! ```

mod loader;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use loader::{configs_dir, core_config_path, mirage_base_dir, HOME_VAR};

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

    /// Could not determine the base directory
    #[error("Config directory not available - could not resolve base path")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Resolution cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Memoize actor identification results
    pub cache_identified: bool,

    /// Frames between compaction passes, 0 disables periodic compaction
    pub compaction_interval_frames: u64,

    /// Warn when per-frame maintenance takes longer than this (microseconds)
    pub slow_frame_warn_us: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_identified: true,
            compaction_interval_frames: 600,
            slow_frame_warn_us: 1000,
        }
    }
}

/// Core framework configuration.
///
/// Loaded from `<base>/configs/core.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    pub resolver: ResolverConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            resolver: ResolverConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Load core config from the default location, creating it if missing.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(core_config_path()?)
    }

    /// Load core config from `path`, creating a default file if missing.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::debug!("Loaded core config from {:?}", path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save_to(path)?;
            tracing::info!("Created default core config at {:?}", path);
            Ok(default)
        }
    }

    /// Save core config to the default location.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(core_config_path()?)
    }

    /// Save core config to `path`, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved core config to {:?}", path);
        Ok(())
    }

    /// Reload core config from `path`.
    ///
    /// On error `self` is left unchanged.
    pub fn reload_from(&mut self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded core config from {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static NEXT_DIR: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "mirage-config-test-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_core_config_default() {
        let config = CoreConfig::default();
        assert_eq!(config.version, 1);
        assert!(!config.debug);
        assert!(config.resolver.cache_identified);
        assert_eq!(config.resolver.compaction_interval_frames, 600);
    }

    #[test]
    fn test_core_config_serialize() {
        let config = CoreConfig {
            version: 2,
            debug: true,
            resolver: ResolverConfig {
                cache_identified: false,
                ..Default::default()
            },
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 2"));
        assert!(toml_str.contains("debug = true"));
        assert!(toml_str.contains("[resolver]"));
        assert!(toml_str.contains("cache_identified = false"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: CoreConfig = toml::from_str("debug = true\n[resolver]\nslow_frame_warn_us = 50\n").unwrap();
        assert!(config.debug);
        assert_eq!(config.version, 1);
        assert_eq!(config.resolver.slow_frame_warn_us, 50);
        assert!(config.resolver.cache_identified);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = temp_dir();
        let path = dir.join("configs").join("core.toml");

        let config = CoreConfig::load_from(&path).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(path.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_and_reload() {
        let dir = temp_dir();
        let path = dir.join("core.toml");

        let mut config = CoreConfig::default();
        config.resolver.compaction_interval_frames = 30;
        config.save_to(&path).unwrap();

        let mut loaded = CoreConfig::default();
        loaded.reload_from(&path).unwrap();
        assert_eq!(loaded.resolver.compaction_interval_frames, 30);

        std::fs::write(&path, "version = \"not a number\"").unwrap();
        assert!(matches!(loaded.reload_from(&path), Err(ConfigError::ParseError(_))));
        assert_eq!(loaded.resolver.compaction_interval_frames, 30);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
