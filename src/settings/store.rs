//! Settings persistence over a pluggable key-value store.
//!
//! Settings are a convenience, not critical state: a broken or missing
//! backend must never take the reading view down. Load and save therefore
//! swallow storage errors after logging and fall back to defaults.

use super::types::{PanelSettings, PartialPanelSettings, StorageError};
use super::validate::validate_settings;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Storage key the panel settings live under.
pub const SETTINGS_STORAGE_KEY: &str = "marginalia.panel";

/// Minimal key-value backend the settings layer persists through. Values
/// are JSON strings; the backend does not interpret them.
pub trait SettingsStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Loads panel settings, falling back to defaults when the backend fails,
/// the key is missing, or the stored JSON is malformed. Readable fields of
/// a partially corrupt object are kept.
pub fn load_settings(store: &dyn SettingsStore) -> PanelSettings {
    let raw = match store.read(SETTINGS_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return PanelSettings::default(),
        Err(err) => {
            warn!(code = err.code(), error = %err, "settings read failed, using defaults");
            return PanelSettings::default();
        }
    };

    match PartialPanelSettings::from_json(&raw) {
        Ok(partial) => validate_settings(partial),
        Err(err) => {
            warn!(error = %err, "stored settings are not valid JSON, using defaults");
            PanelSettings::default()
        }
    }
}

/// Persists panel settings, clamping dimensions first so an out-of-range
/// value can never be written. Storage errors are logged and swallowed.
pub fn save_settings(store: &mut dyn SettingsStore, settings: &PanelSettings) {
    let snapshot = settings.clone().clamped();
    let json = match serde_json::to_string(&snapshot) {
        Ok(json) => json,
        Err(err) => {
            warn!(error = %err, "settings serialization failed, nothing saved");
            return;
        }
    };
    match store.write(SETTINGS_STORAGE_KEY, &json) {
        Ok(()) => debug!("panel settings saved"),
        Err(err) => {
            warn!(code = err.code(), error = %err, "settings write failed, changes not persisted");
        }
    }
}

/// In-memory backend, used in tests and as the fallback when no platform
/// storage is wired up.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
