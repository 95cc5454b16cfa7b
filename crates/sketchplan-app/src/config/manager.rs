//! Configuration manager for loading, saving, and resetting the drawing configuration

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use super::DrawConfig;

/// Shared configuration manager type
pub type SharedConfig = Arc<RwLock<ConfigManager>>;

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Owns the drawing configuration and the file it is stored in
#[derive(Debug)]
pub struct ConfigManager {
    config: DrawConfig,
    config_path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Create a manager for the default config file, loading it if present
    pub fn new() -> Self {
        Self::with_path(Self::default_path())
    }

    /// Create a manager for an explicit config file, loading it if present
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let config = match Self::load(&config_path) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", config_path);
                config
            }
            Err(ConfigError::Io(_)) => {
                tracing::info!("No config file found, using defaults");
                DrawConfig::new()
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file: {}", e);
                DrawConfig::new()
            }
        };

        Self {
            config,
            config_path,
            dirty: false,
        }
    }

    /// Create a manager around an in-memory configuration
    pub fn from_config(config: DrawConfig, config_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            config_path: config_path.into(),
            dirty: true,
        }
    }

    /// Get the OS-standard configuration directory
    fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sketchplan")
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("draw.ron")
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<DrawConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Get a reference to the current configuration
    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// Get a mutable reference to the configuration (marks as dirty)
    pub fn config_mut(&mut self) -> &mut DrawConfig {
        self.dirty = true;
        &mut self.config
    }

    /// Check if the configuration has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Save the configuration to disk
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(&self.config_path, &content).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::info!("Saved config to {:?}", self.config_path);
        self.dirty = false;
        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset_to_defaults(&mut self) {
        self.config = DrawConfig::new();
        self.dirty = true;
    }

    /// Get the config file path
    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a new shared configuration manager
pub fn create_shared_config() -> SharedConfig {
    Arc::new(RwLock::new(ConfigManager::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("sketchplan-test-{}", uuid::Uuid::new_v4()))
            .join("draw.ron")
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let manager = ConfigManager::with_path(scratch_path());
        assert_eq!(manager.config(), &DrawConfig::new());
        assert!(!manager.is_dirty());
    }

    #[test]
    fn test_save_and_reload() {
        let path = scratch_path();
        let mut manager = ConfigManager::with_path(&path);
        manager.config_mut().input.snap_to_grid = true;
        manager.config_mut().input.grid_spacing = 0.5;
        assert!(manager.is_dirty());

        manager.save().unwrap();
        assert!(!manager.is_dirty());

        let reloaded = ConfigManager::with_path(&path);
        assert!(reloaded.config().input.snap_to_grid);
        assert_eq!(reloaded.config().input.grid_spacing, 0.5);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_unparsable_file_falls_back() {
        let path = scratch_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).unwrap();
        }
        std::fs::write(&path, "(version: \"nope\"").unwrap();

        assert!(matches!(
            ConfigManager::load(&path),
            Err(ConfigError::Deserialize(_))
        ));
        let manager = ConfigManager::with_path(&path);
        assert_eq!(manager.config(), &DrawConfig::new());

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut config = DrawConfig::new();
        config.feedback.width = 4.0;
        let mut manager = ConfigManager::from_config(config, scratch_path());

        manager.reset_to_defaults();
        assert_eq!(manager.config().feedback.width, 20.0);
        assert!(manager.is_dirty());
    }
}
