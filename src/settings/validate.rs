//! Validation and defaulting of panel settings.

use super::types::{FilterPreset, PanelSettings, PartialPanelSettings};
use crate::annotations::AnnotationType;
use crate::query::FilterCriteria;

pub const MIN_PANEL_WIDTH: u32 = 280;
pub const MAX_PANEL_WIDTH: u32 = 600;
pub const MIN_PANEL_HEIGHT: u32 = 200;
pub const MAX_PANEL_HEIGHT: u32 = 500;

/// Completes a partial settings object: missing fields take their defaults
/// and dimensions are clamped into the allowed window. Never fails; bad
/// input degrades to defaults.
pub fn validate_settings(partial: PartialPanelSettings) -> PanelSettings {
    let defaults = PanelSettings::default();
    PanelSettings {
        position: partial.position.unwrap_or(defaults.position),
        width: partial
            .width
            .unwrap_or(defaults.width)
            .clamp(MIN_PANEL_WIDTH, MAX_PANEL_WIDTH),
        height: partial
            .height
            .unwrap_or(defaults.height)
            .clamp(MIN_PANEL_HEIGHT, MAX_PANEL_HEIGHT),
        filter_preset: partial.filter_preset.unwrap_or(defaults.filter_preset),
        sort_field: partial.sort_field.unwrap_or(defaults.sort_field),
        sort_direction: partial.sort_direction.unwrap_or(defaults.sort_direction),
    }
}

impl PanelSettings {
    /// Returns a copy with dimensions forced into the allowed window.
    /// Run before persisting anything caller-supplied.
    pub fn clamped(mut self) -> Self {
        self.width = self.width.clamp(MIN_PANEL_WIDTH, MAX_PANEL_WIDTH);
        self.height = self.height.clamp(MIN_PANEL_HEIGHT, MAX_PANEL_HEIGHT);
        self
    }
}

/// Expands a toolbar preset into the filter criteria it stands for.
/// `Recent` relies on the panel's date sort and applies no filter of its own.
pub fn preset_to_filters(preset: FilterPreset) -> FilterCriteria {
    match preset {
        FilterPreset::All | FilterPreset::Recent => FilterCriteria::any(),
        FilterPreset::NotesOnly => {
            FilterCriteria::any().with_types(vec![AnnotationType::Note])
        }
        FilterPreset::WithNotes => FilterCriteria::any().with_has_note(true),
    }
}
