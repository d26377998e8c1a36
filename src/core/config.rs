//! Configuration management
//!
//! The config is a small JSON document holding the selected device. It is
//! loaded once at startup and written back after every change.

use crate::error::{Error, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Folder under the user config directory
const APP_DIR_NAME: &str = "bluetooth-menubar";

/// Config file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Selected device configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Hardware address of the selected device (empty when unset)
    #[serde(default)]
    pub mac_address: String,
    /// Display name of the selected device (may be empty when unknown)
    #[serde(default)]
    pub device_name: String,
}

impl Config {
    /// Config pointing at a device
    pub fn with_device(mac_address: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            mac_address: mac_address.into(),
            device_name: device_name.into(),
        }
    }

    /// Whether a device is selected
    pub fn has_device(&self) -> bool {
        !self.mac_address.is_empty()
    }

    /// Name shown in the menu: the device name, falling back to the address
    pub fn label(&self) -> &str {
        if self.device_name.is_empty() {
            &self.mac_address
        } else {
            &self.device_name
        }
    }
}

/// Reads and writes `Config` at a fixed path
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at the default location (`<config dir>/bluetooth-menubar/config.json`)
    pub fn new() -> Result<Self> {
        let base = BaseDirs::new().ok_or(Error::NoConfigDir)?;
        Ok(Self::at(
            base.config_dir().join(APP_DIR_NAME).join(CONFIG_FILE_NAME),
        ))
    }

    /// Store at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, returning the default when the file does not exist
    pub fn load(&self) -> Result<Config> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No config at {:?}, starting unconfigured", self.path);
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(Error::ConfigLoad {
                    path: self.path.clone(),
                    source: Box::new(e),
                })
            }
        };

        let config: Config = serde_json::from_str(&content).map_err(|e| Error::ConfigLoad {
            path: self.path.clone(),
            source: Box::new(e),
        })?;
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    /// Save the config, creating the parent directory if needed
    pub fn save(&self, config: &Config) -> Result<()> {
        let save_err = |source: crate::error::BoxedSource| Error::ConfigSave {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_err(Box::new(e)))?;
        }

        let content = serde_json::to_string(config).map_err(|e| save_err(Box::new(e)))?;
        std::fs::write(&self.path, content).map_err(|e| save_err(Box::new(e)))?;

        debug!("Saved config to {:?}", self.path);
        Ok(())
    }

    /// Persist an empty config
    pub fn clear(&self) -> Result<()> {
        self.save(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ConfigStore {
        ConfigStore::at(dir.path().join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    #[test]
    fn test_load_missing_returns_default() {
        let dir = TempDir::new().unwrap();
        let config = store_in(&dir).load().unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.has_device());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let config = Config::with_device("AA:BB:CC:DD:EE:FF", "Buds");

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::at(dir.path().join("a").join("b").join(CONFIG_FILE_NAME));
        store.save(&Config::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_json_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&Config::with_device("11-22", "Pods")).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["mac_address"], "11-22");
        assert_eq!(value["device_name"], "Pods");
    }

    #[test]
    fn test_missing_name_key_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"mac_address":"11-22"}"#).unwrap();

        let config = store.load().unwrap();
        assert_eq!(config.mac_address, "11-22");
        assert_eq!(config.label(), "11-22");
    }

    #[test]
    fn test_malformed_json_is_load_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.load(), Err(Error::ConfigLoad { .. })));
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&Config::with_device("11-22", "Pods")).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), Config::default());
    }

    #[test]
    fn test_save_into_file_parent_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = ConfigStore::at(blocker.join(CONFIG_FILE_NAME));

        assert!(matches!(
            store.save(&Config::default()),
            Err(Error::ConfigSave { .. })
        ));
    }
}
