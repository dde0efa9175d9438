use bevy::log::{debug, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, ViewerError};

/// Generic key/value persistence for user choices.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value. Persistence failures are logged, not returned.
    fn set(&mut self, key: &str, value: &str);
}

/// Settings that live for the session only.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, String>,
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Settings persisted as a flat JSON object, rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileSettings {
    /// Load from `path`; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).map_err(|e| ViewerError::SettingsFormat {
                path: path.clone(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(ViewerError::SettingsIo { path, source }),
        };
        debug!("Loaded settings from {}", path.display());
        Ok(Self { path, values })
    }

    /// Like `open`, but falls back to an empty store when the file is unusable.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{e}; starting with empty settings");
                Self {
                    path,
                    values: BTreeMap::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.values).map_err(|e| {
            ViewerError::SettingsFormat {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;
        std::fs::write(&self.path, json).map_err(|source| ViewerError::SettingsIo {
            path: self.path.clone(),
            source,
        })
    }
}

impl SettingsStore for JsonFileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return;
        }
        self.values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save() {
            warn!("Failed to persist setting '{key}': {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_roundtrip() {
        let mut settings = MemorySettings::default();
        assert_eq!(settings.get("output.last_kind"), None);
        settings.set("output.last_kind", "stereo");
        assert_eq!(settings.get("output.last_kind").as_deref(), Some("stereo"));
    }

    #[test]
    fn test_file_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = JsonFileSettings::open(&path).unwrap();
        settings.set("output.last_kind", "mono");
        assert!(path.exists());

        let reopened = JsonFileSettings::open(&path).unwrap();
        assert_eq!(reopened.get("output.last_kind").as_deref(), Some("mono"));
    }

    #[test]
    fn test_corrupt_file_is_reported_and_recovered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            JsonFileSettings::open(&path),
            Err(ViewerError::SettingsFormat { .. })
        ));

        let settings = JsonFileSettings::open_or_empty(&path);
        assert_eq!(settings.get("anything"), None);
    }

    #[test]
    fn test_unwritable_path_keeps_value_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("settings.json");

        let mut settings = JsonFileSettings::open(&path).unwrap();
        settings.set("k", "v");
        assert_eq!(settings.get("k").as_deref(), Some("v"));
        assert!(settings.save().is_err());
    }
}
