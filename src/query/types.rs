//! Criteria and result types for the query engine.

use crate::annotations::{AnnotationType, HighlightColor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when parsing query configuration tokens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("Invalid sort direction: {0}")]
    InvalidSortDirection(String),

    #[error("Invalid filter preset: {0}")]
    InvalidPreset(String),
}

impl ConfigurationError {
    /// Stable machine-readable code for API payloads and logs.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigurationError::InvalidSortField(_) => "invalid_sort_field",
            ConfigurationError::InvalidSortDirection(_) => "invalid_sort_direction",
            ConfigurationError::InvalidPreset(_) => "invalid_preset",
        }
    }
}

/// Conjunctive filter over an annotation sequence. Absent fields impose no
/// constraint; an annotation matches only when every present field accepts it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Keep only these annotation types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<AnnotationType>>,
    /// `Some(true)` keeps annotations with a note, `Some(false)` those without.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_note: Option<bool>,
    /// Case-insensitive substring match against the note text or, for
    /// highlights, the selected text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Keep only highlights in these colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<HighlightColor>>,
    /// Keep only publicly visible annotations.
    pub public_only: bool,
}

impl FilterCriteria {
    /// Criteria that matches everything.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_types(mut self, types: Vec<AnnotationType>) -> Self {
        self.types = Some(types);
        self
    }

    pub fn with_has_note(mut self, has_note: bool) -> Self {
        self.has_note = Some(has_note);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_colors(mut self, colors: Vec<HighlightColor>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn public_only(mut self) -> Self {
        self.public_only = true;
        self
    }

    /// True when no field constrains the result.
    pub fn is_empty(&self) -> bool {
        self.types.is_none()
            && self.has_note.is_none()
            && self.search.is_none()
            && self.colors.is_none()
            && !self.public_only
    }
}

/// Annotation field a sequence can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    StartOffset,
    Type,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::StartOffset => "startOffset",
            SortField::Type => "type",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            "startOffset" => Ok(SortField::StartOffset),
            "type" => Ok(SortField::Type),
            _ => Err(ConfigurationError::InvalidSortField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ConfigurationError::InvalidSortDirection(s.to_string())),
        }
    }
}

/// Field and direction for ordering an annotation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: SortField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn descending(field: SortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

impl Default for SortSpec {
    /// Newest first, the reader panel's default ordering.
    fn default() -> Self {
        Self::descending(SortField::CreatedAt)
    }
}

/// A maximal run of transitively overlapping highlight ranges, with the ids
/// of every highlight that contributed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedRange {
    pub start_offset: usize,
    pub end_offset: usize,
    pub annotation_ids: Vec<String>,
}
