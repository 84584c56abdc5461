use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::journal::model::MapPlatform;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "TRAVELOG_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    File,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Data directory. Holds `travelog.db` for the SQLite backend and the
    /// `store/` directory for the file backend.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Key the journal document is stored under.
    #[serde(default = "default_data_key")]
    pub data_key: String,
}

fn default_data_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("travelog")
}

fn default_data_key() -> String {
    "appData".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_data_path(),
            data_key: default_data_key(),
        }
    }
}

impl StorageConfig {
    pub fn sqlite_path(&self) -> PathBuf {
        self.path.join("travelog.db")
    }

    pub fn file_dir(&self) -> PathBuf {
        self.path.join("store")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    /// Which map application location links target.
    #[serde(default)]
    pub map_platform: MapPlatform,
}

impl Config {
    /// Load from `TRAVELOG_CONFIG` if set, otherwise from the default location.
    /// A missing default config is created with default values.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from(Path::new(&path));
        }

        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            // Create default config
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("travelog")
    }

    pub fn log_dir() -> PathBuf {
        Self::config_dir().join("logs")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\nbackend = \"file\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.data_key, "appData");
        assert_eq!(config.display.map_platform, MapPlatform::Android);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.storage.path = dir.path().join("data");
        config.display.map_platform = MapPlatform::Ios;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.storage.path, dir.path().join("data"));
        assert_eq!(loaded.display.map_platform, MapPlatform::Ios);
        assert_eq!(loaded.storage.sqlite_path(), dir.path().join("data").join("travelog.db"));
    }

    #[test]
    fn test_invalid_backend_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\nbackend = \"postgres\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
