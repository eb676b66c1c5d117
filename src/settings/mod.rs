//! Panel view-state settings: validation with clamped dimensions, filter
//! presets, and fault-tolerant persistence through a key-value store.

mod store;
mod types;
mod validate;

pub use store::{load_settings, save_settings, MemoryStore, SettingsStore, SETTINGS_STORAGE_KEY};
pub use types::{
    FilterPreset, PanelPosition, PanelSettings, PartialPanelSettings, StorageError,
};
pub use validate::{
    preset_to_filters, validate_settings, MAX_PANEL_HEIGHT, MAX_PANEL_WIDTH, MIN_PANEL_HEIGHT,
    MIN_PANEL_WIDTH,
};
