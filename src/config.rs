//! Configuration loading and persistence
//!
//! Each app keeps a flat JSON object in `<config dir>/chat-tray/<app>.json`.
//! The object is loaded once at startup and overwritten whole on save.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Directory under the platform config dir holding all app files
const CONFIG_DIR_NAME: &str = "chat-tray";

/// Key holding the completion API key
pub const API_KEY: &str = "api_key";

/// Key holding the app's hotkey chord
pub const HOTKEY: &str = "hotkey";

/// Key holding the completion model name
pub const MODEL: &str = "model";

/// Errors reading or writing the settings file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not locate the user config directory")]
    NoConfigDir,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings(Map<String, Value>);

impl Settings {
    /// Empty settings
    pub fn new() -> Self {
        Self::default()
    }

    /// String value for `key`, if present and a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Set `key` to a string value
    pub fn set_str(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), Value::String(value.into()));
    }

    /// Stored API key, empty if unset
    pub fn api_key(&self) -> &str {
        self.get_str(API_KEY).unwrap_or_default()
    }

    /// Stored hotkey chord, if any
    pub fn hotkey(&self) -> Option<&str> {
        self.get_str(HOTKEY).filter(|s| !s.trim().is_empty())
    }

    /// Underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Settings {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Reads and writes one app's settings file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by an explicit file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the per-user location for `app`
    pub fn for_app(app: &str) -> Result<Self, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(
            dir.join(CONFIG_DIR_NAME).join(format!("{}.json", app)),
        ))
    }

    /// Path of the settings file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields empty settings
    pub fn try_load(&self) -> Result<Settings, ConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "no settings file, using defaults");
                return Ok(Settings::new());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let map: Map<String, Value> =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(Settings::from(map))
    }

    /// Load settings, falling back to empty settings on any error
    pub fn load(&self) -> Settings {
        self.try_load().unwrap_or_else(|e| {
            warn!(error = %e, "failed to load settings, starting empty");
            Settings::new()
        })
    }

    /// Overwrite the settings file
    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(settings.as_map()).map_err(|source| {
            ConfigError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, content).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = ?self.path, "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path() {
        let store = ConfigStore::for_app("translator").unwrap();
        let path = store.path().to_string_lossy();
        assert!(path.contains("chat-tray"));
        assert!(path.ends_with("translator.json"));
    }

    #[test]
    fn test_save_then_load_in_new_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("translator.json");

        let mut settings = Settings::new();
        settings.set_str(API_KEY, "sk-test");
        ConfigStore::new(&path).save(&settings).unwrap();

        let loaded = ConfigStore::new(&path).try_load().unwrap();
        assert_eq!(loaded.api_key(), "sk-test");
        assert_eq!(loaded.get_str("api_key"), Some("sk-test"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("absent.json"));
        let settings = store.try_load().unwrap();
        assert!(settings.as_map().is_empty());
        assert_eq!(settings.api_key(), "");
        assert_eq!(settings.hotkey(), None);
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = ConfigStore::new(&path);
        assert!(matches!(store.try_load(), Err(ConfigError::Parse { .. })));
        assert_eq!(store.load(), Settings::new());
    }

    #[test]
    fn test_save_overwrites_and_keeps_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launcher.json");
        std::fs::write(&path, r#"{"theme":"dark","hotkey":"ctrl+g, g"}"#).unwrap();

        let store = ConfigStore::new(&path);
        let mut settings = store.load();
        settings.set_str(HOTKEY, "ctrl+h, h");
        store.save(&settings).unwrap();

        let reloaded = store.load();
        assert_eq!(reloaded.hotkey(), Some("ctrl+h, h"));
        assert_eq!(reloaded.get_str("theme"), Some("dark"));
    }

    #[test]
    fn test_save_to_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be
        let store = ConfigStore::new(dir.path());
        assert!(matches!(
            store.save(&Settings::new()),
            Err(ConfigError::Io { .. })
        ));
    }
}
