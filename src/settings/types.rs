//! Reader panel settings and their storage error type.

use crate::query::{ConfigurationError, SortDirection, SortField};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors surfaced by a settings storage backend. The load and save paths
/// swallow these after logging; they exist so backends can be tested and
/// composed.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage read failed: {0}")]
    ReadFailed(String),

    #[error("Storage write failed: {0}")]
    WriteFailed(String),
}

impl StorageError {
    /// Stable machine-readable code for API payloads and logs.
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::Unavailable(_) => "storage_unavailable",
            StorageError::ReadFailed(_) => "storage_read_failed",
            StorageError::WriteFailed(_) => "storage_write_failed",
        }
    }
}

/// Which side of the reading view the panel docks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelPosition {
    Left,
    #[default]
    Right,
}

impl PanelPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelPosition::Left => "left",
            PanelPosition::Right => "right",
        }
    }
}

impl fmt::Display for PanelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named filter shortcut shown in the panel toolbar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterPreset {
    #[default]
    All,
    NotesOnly,
    WithNotes,
    Recent,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 4] = [
        FilterPreset::All,
        FilterPreset::NotesOnly,
        FilterPreset::WithNotes,
        FilterPreset::Recent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterPreset::All => "all",
            FilterPreset::NotesOnly => "notes-only",
            FilterPreset::WithNotes => "with-notes",
            FilterPreset::Recent => "recent",
        }
    }

    /// Label shown in the panel toolbar.
    pub fn label(&self) -> &'static str {
        match self {
            FilterPreset::All => "All annotations",
            FilterPreset::NotesOnly => "Notes only",
            FilterPreset::WithNotes => "With notes",
            FilterPreset::Recent => "Recent",
        }
    }
}

impl fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterPreset {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(FilterPreset::All),
            "notes-only" => Ok(FilterPreset::NotesOnly),
            "with-notes" => Ok(FilterPreset::WithNotes),
            "recent" => Ok(FilterPreset::Recent),
            _ => Err(ConfigurationError::InvalidPreset(s.to_string())),
        }
    }
}

/// Complete panel view state, as persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSettings {
    pub position: PanelPosition,
    pub width: u32,
    pub height: u32,
    pub filter_preset: FilterPreset,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            position: PanelPosition::Right,
            width: 360,
            height: 400,
            filter_preset: FilterPreset::All,
            sort_field: SortField::CreatedAt,
            sort_direction: SortDirection::Desc,
        }
    }
}

/// Partial settings, as read back from storage or sent by a UI update.
/// Every field is optional; missing or unreadable fields fall back to
/// defaults during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialPanelSettings {
    pub position: Option<PanelPosition>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub filter_preset: Option<FilterPreset>,
    pub sort_field: Option<SortField>,
    pub sort_direction: Option<SortDirection>,
}

impl PartialPanelSettings {
    /// Reads a partial settings object out of raw JSON, field by field.
    /// A field that fails to decode is dropped rather than failing the
    /// whole object, so one corrupt value cannot wipe the rest.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Ok(Self {
            position: field(&value, "position"),
            width: field(&value, "width"),
            height: field(&value, "height"),
            filter_preset: field(&value, "filterPreset"),
            sort_field: field(&value, "sortField"),
            sort_direction: field(&value, "sortDirection"),
        })
    }
}

fn field<T: serde::de::DeserializeOwned>(value: &serde_json::Value, key: &str) -> Option<T> {
    value
        .get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}
