//! Configuration management for Lectio
//!
//! This module handles loading and managing application configuration
//! from the user config file and environment variables. The locator and
//! playback sections are injected into the components that consume them;
//! nothing in the core reads the environment on its own.

use crate::media::LocatorConfig;
use crate::player::SessionConfig;
use crate::utils::error::{LectioError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Playback session configuration
    pub playback: SessionConfig,

    /// Resource locator configuration
    pub locator: LocatorConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Book to open at startup
    pub start_book: String,

    /// Chapter to open at startup (1-based)
    pub start_chapter: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            start_book: "Genesis".to_string(),
            start_chapter: 1,
        }
    }
}

impl Config {
    /// Load configuration from various sources
    ///
    /// Configuration is loaded in the following order (later sources
    /// override earlier):
    /// 1. Default values
    /// 2. User config file (~/.config/lectio/config.toml on Linux)
    /// 3. Environment variables (LECTIO_* prefix)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                config = Self::from_file(&user_path)?;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LectioError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| LectioError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to the user config file.
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()
            .ok_or_else(|| LectioError::Config("Cannot determine user config path".to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LectioError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| LectioError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&path, toml)
            .map_err(|e| LectioError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key-value source (separated out so tests
    /// need not mutate the process environment).
    fn apply_overrides<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = get("LECTIO_BASE_URL") {
            self.locator.base_url = base_url;
        }

        if let Some(version) = get("LECTIO_VERSION") {
            self.locator.version = version;
        }

        if let Some(log_level) = get("LECTIO_LOG_LEVEL") {
            self.general.log_level = log_level;
        }

        if let Some(interval) = get("LECTIO_SKIP_INTERVAL") {
            self.playback.skip_interval_secs = interval
                .parse()
                .map_err(|_| LectioError::Config("Invalid LECTIO_SKIP_INTERVAL".to_string()))?;
        }

        if let Some(policy) = get("LECTIO_AUTOPLAY") {
            self.playback.autoplay = policy
                .parse()
                .map_err(|_| LectioError::Config("Invalid LECTIO_AUTOPLAY".to_string()))?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.general.log_level.as_str()) {
            return Err(LectioError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level, valid_log_levels
            )));
        }

        if self.locator.base_url.is_empty() {
            return Err(LectioError::Config("Base URL must not be empty".to_string()));
        }

        if self.locator.version.is_empty() {
            return Err(LectioError::Config("Version must not be empty".to_string()));
        }

        if self.playback.skip_interval_secs <= 0.0 {
            return Err(LectioError::Config(
                "Skip interval must be positive".to_string(),
            ));
        }

        if self.playback.rewind_tolerance_secs < 0.0
            || self.playback.rewind_tolerance_secs >= self.playback.skip_interval_secs
        {
            return Err(LectioError::Config(
                "Rewind tolerance must be non-negative and below the skip interval".to_string(),
            ));
        }

        if self.general.start_chapter == 0 {
            return Err(LectioError::Config(
                "Start chapter must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Get user config file path
    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lectio").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::AutoplayPolicy;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.start_book, "Genesis");
        assert_eq!(config.general.start_chapter, 1);
        assert_eq!(config.locator.version, "kjv");
        assert_eq!(config.playback.skip_interval_secs, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.general.log_level = "loud".to_string();
        assert!(config.validate().is_err());
        config.general.log_level = "debug".to_string();
        assert!(config.validate().is_ok());

        config.playback.skip_interval_secs = 0.0;
        assert!(config.validate().is_err());
        config.playback.skip_interval_secs = 10.0;

        config.playback.rewind_tolerance_secs = 10.0;
        assert!(config.validate().is_err());
        config.playback.rewind_tolerance_secs = 0.25;

        config.general.start_chapter = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut vars = HashMap::new();
        vars.insert("LECTIO_BASE_URL", "https://cdn.example.org");
        vars.insert("LECTIO_VERSION", "web");
        vars.insert("LECTIO_AUTOPLAY", "never");
        vars.insert("LECTIO_SKIP_INTERVAL", "15");

        let mut config = Config::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.locator.base_url, "https://cdn.example.org");
        assert_eq!(config.locator.version, "web");
        assert_eq!(config.playback.autoplay, AutoplayPolicy::Never);
        assert_eq!(config.playback.skip_interval_secs, 15.0);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == "LECTIO_SKIP_INTERVAL").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml).unwrap();

        assert_eq!(config.locator.base_url, deserialized.locator.base_url);
        assert_eq!(config.playback.autoplay, deserialized.playback.autoplay);
        assert_eq!(config.general.start_book, deserialized.general.start_book);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[locator]\nbase_url = \"https://cdn.example.org\"\n\n[playback]\nautoplay = \"never\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.locator.base_url, "https://cdn.example.org");
        assert_eq!(config.playback.autoplay, AutoplayPolicy::Never);
        // Untouched sections fall back to defaults
        assert_eq!(config.locator.version, "kjv");
        assert_eq!(config.general.log_level, "info");
    }
}
