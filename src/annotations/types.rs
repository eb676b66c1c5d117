//! Core annotation types shared across the crate.
//!
//! An annotation is a typed mark anchored to a character-offset range of a
//! book: a highlight over a text selection, a free-standing note, or a
//! zero-width bookmark. The range is half-open in spirit but stored as plain
//! offsets; validation enforces the per-type shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when constructing or validating annotations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("End offset {end} precedes start offset {start}")]
    InvertedRange { start: usize, end: usize },

    #[error("Bookmark must cover a single point, got range {start}..{end}")]
    BookmarkSpan { start: usize, end: usize },

    #[error("Note text must not be empty")]
    EmptyNote,

    #[error("Duplicate annotation id: {0}")]
    DuplicateId(String),

    #[error("Annotation belongs to book '{found}', expected '{expected}'")]
    BookMismatch { expected: String, found: String },

    #[error("Unknown annotation type: {0}")]
    UnknownType(String),

    #[error("Unknown highlight color: {0}")]
    UnknownColor(String),
}

impl ValidationError {
    /// Stable machine-readable code for API payloads and logs.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvertedRange { .. } => "inverted_range",
            ValidationError::BookmarkSpan { .. } => "bookmark_span",
            ValidationError::EmptyNote => "empty_note",
            ValidationError::DuplicateId(_) => "duplicate_id",
            ValidationError::BookMismatch { .. } => "book_mismatch",
            ValidationError::UnknownType(_) => "unknown_type",
            ValidationError::UnknownColor(_) => "unknown_color",
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Discriminant for the three annotation shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    Highlight,
    Note,
    Bookmark,
}

impl AnnotationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationType::Highlight => "highlight",
            AnnotationType::Note => "note",
            AnnotationType::Bookmark => "bookmark",
        }
    }

    /// Human-readable singular label, used for item headers in exports.
    pub fn label(&self) -> &'static str {
        match self {
            AnnotationType::Highlight => "Highlight",
            AnnotationType::Note => "Note",
            AnnotationType::Bookmark => "Bookmark",
        }
    }

    /// Plural label, used for export section headings.
    pub fn plural_label(&self) -> &'static str {
        match self {
            AnnotationType::Highlight => "Highlights",
            AnnotationType::Note => "Notes",
            AnnotationType::Bookmark => "Bookmarks",
        }
    }

    /// Icon token consumed by reader UIs.
    pub fn icon(&self) -> &'static str {
        match self {
            AnnotationType::Highlight => "highlighter",
            AnnotationType::Note => "note-text",
            AnnotationType::Bookmark => "bookmark",
        }
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnnotationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "highlight" => Ok(AnnotationType::Highlight),
            "note" => Ok(AnnotationType::Note),
            "bookmark" => Ok(AnnotationType::Bookmark),
            _ => Err(ValidationError::UnknownType(s.to_string())),
        }
    }
}

/// Fixed six-color highlight palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    Yellow,
    Green,
    Blue,
    Pink,
    Purple,
    Orange,
}

impl HighlightColor {
    pub const ALL: [HighlightColor; 6] = [
        HighlightColor::Yellow,
        HighlightColor::Green,
        HighlightColor::Blue,
        HighlightColor::Pink,
        HighlightColor::Purple,
        HighlightColor::Orange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "yellow",
            HighlightColor::Green => "green",
            HighlightColor::Blue => "blue",
            HighlightColor::Pink => "pink",
            HighlightColor::Purple => "purple",
            HighlightColor::Orange => "orange",
        }
    }

    /// CSS hex value rendered by reader UIs.
    pub fn hex(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "#ffeb3b",
            HighlightColor::Green => "#4caf50",
            HighlightColor::Blue => "#2196f3",
            HighlightColor::Pink => "#e91e63",
            HighlightColor::Purple => "#9c27b0",
            HighlightColor::Orange => "#ff9800",
        }
    }
}

impl Default for HighlightColor {
    fn default() -> Self {
        HighlightColor::Yellow
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HighlightColor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yellow" => Ok(HighlightColor::Yellow),
            "green" => Ok(HighlightColor::Green),
            "blue" => Ok(HighlightColor::Blue),
            "pink" => Ok(HighlightColor::Pink),
            "purple" => Ok(HighlightColor::Purple),
            "orange" => Ok(HighlightColor::Orange),
            _ => Err(ValidationError::UnknownColor(s.to_string())),
        }
    }
}

/// Per-type payload. Serialized inline with the base record under a
/// `type` tag, so a highlight round-trips as
/// `{"type": "highlight", "selectedText": ..., "color": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnnotationKind {
    Highlight {
        #[serde(rename = "selectedText")]
        selected_text: String,
        color: HighlightColor,
    },
    Note {
        /// Snippet of the passage the note was attached to, if any.
        #[serde(
            rename = "selectedText",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        context: Option<String>,
    },
    Bookmark,
}

impl AnnotationKind {
    pub fn annotation_type(&self) -> AnnotationType {
        match self {
            AnnotationKind::Highlight { .. } => AnnotationType::Highlight,
            AnnotationKind::Note { .. } => AnnotationType::Note,
            AnnotationKind::Bookmark => AnnotationType::Bookmark,
        }
    }
}

/// A single annotation anchored to a character-offset range of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,
    pub book_id: String,
    #[serde(flatten)]
    pub kind: AnnotationKind,
    pub start_offset: usize,
    pub end_offset: usize,
    /// Free-text note. Required (non-empty) for `Note`, optional otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub is_public: bool,
    pub like_count: u32,
    pub is_liked_by_current_user: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Annotation {
    fn base(book_id: String, kind: AnnotationKind, start: usize, end: usize) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            book_id,
            kind,
            start_offset: start,
            end_offset: end,
            note: None,
            is_public: false,
            like_count: 0,
            is_liked_by_current_user: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a highlight over `start..end` with the selected passage text.
    pub fn highlight(
        book_id: impl Into<String>,
        start: usize,
        end: usize,
        selected_text: impl Into<String>,
        color: HighlightColor,
    ) -> ValidationResult<Self> {
        if end < start {
            return Err(ValidationError::InvertedRange { start, end });
        }
        Ok(Self::base(
            book_id.into(),
            AnnotationKind::Highlight {
                selected_text: selected_text.into(),
                color,
            },
            start,
            end,
        ))
    }

    /// Creates a note attached to `start..end`. The note text must be
    /// non-empty after trimming.
    pub fn note(
        book_id: impl Into<String>,
        start: usize,
        end: usize,
        text: impl Into<String>,
    ) -> ValidationResult<Self> {
        if end < start {
            return Err(ValidationError::InvertedRange { start, end });
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyNote);
        }
        let mut annotation = Self::base(
            book_id.into(),
            AnnotationKind::Note { context: None },
            start,
            end,
        );
        annotation.note = Some(text);
        Ok(annotation)
    }

    /// Creates a zero-width bookmark at `offset`. Cannot fail: the single
    /// offset makes the start == end invariant hold by construction.
    pub fn bookmark(book_id: impl Into<String>, offset: usize) -> Self {
        Self::base(book_id.into(), AnnotationKind::Bookmark, offset, offset)
    }

    /// Attaches or replaces the free-text note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Attaches the surrounding passage snippet to a note annotation.
    /// Has no effect on highlights and bookmarks.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        if let AnnotationKind::Note { context: slot } = &mut self.kind {
            *slot = Some(context.into());
        }
        self
    }

    /// Marks the annotation as publicly visible.
    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn annotation_type(&self) -> AnnotationType {
        self.kind.annotation_type()
    }

    pub fn is_highlight(&self) -> bool {
        matches!(self.kind, AnnotationKind::Highlight { .. })
    }

    pub fn is_note(&self) -> bool {
        matches!(self.kind, AnnotationKind::Note { .. })
    }

    pub fn is_bookmark(&self) -> bool {
        matches!(self.kind, AnnotationKind::Bookmark)
    }

    /// Selected passage text: the highlighted text for highlights, the
    /// context snippet for notes, absent for bookmarks.
    pub fn selected_text(&self) -> Option<&str> {
        match &self.kind {
            AnnotationKind::Highlight { selected_text, .. } => Some(selected_text),
            AnnotationKind::Note { context } => context.as_deref(),
            AnnotationKind::Bookmark => None,
        }
    }

    /// Highlight color, absent for notes and bookmarks.
    pub fn color(&self) -> Option<HighlightColor> {
        match &self.kind {
            AnnotationKind::Highlight { color, .. } => Some(*color),
            _ => None,
        }
    }

    /// True when a non-empty note is attached.
    pub fn has_note(&self) -> bool {
        self.note
            .as_deref()
            .map(|n| !n.trim().is_empty())
            .unwrap_or(false)
    }

    /// Replaces the note text in place and bumps `updated_at`.
    /// Passing `None` removes the note.
    pub fn set_note(&mut self, note: Option<String>) {
        self.note = note;
        self.touch();
    }

    /// Recolors a highlight in place and bumps `updated_at`.
    /// Has no effect on notes and bookmarks.
    pub fn set_color(&mut self, color: HighlightColor) {
        if let AnnotationKind::Highlight { color: slot, .. } = &mut self.kind {
            *slot = color;
            self.touch();
        }
    }

    /// Changes public visibility in place and bumps `updated_at`.
    pub fn set_public(&mut self, is_public: bool) {
        self.is_public = is_public;
        self.touch();
    }

    /// Applies or withdraws the current user's like, keeping `like_count`
    /// consistent. Liking twice is a no-op.
    pub fn set_liked(&mut self, liked: bool) {
        if liked == self.is_liked_by_current_user {
            return;
        }
        self.is_liked_by_current_user = liked;
        if liked {
            self.like_count = self.like_count.saturating_add(1);
        } else {
            self.like_count = self.like_count.saturating_sub(1);
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Checks the per-type shape invariants. Deserialized or externally
    /// mutated annotations must pass here before being stored.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.end_offset < self.start_offset {
            return Err(ValidationError::InvertedRange {
                start: self.start_offset,
                end: self.end_offset,
            });
        }
        match &self.kind {
            AnnotationKind::Bookmark => {
                if self.start_offset != self.end_offset {
                    return Err(ValidationError::BookmarkSpan {
                        start: self.start_offset,
                        end: self.end_offset,
                    });
                }
            }
            AnnotationKind::Note { .. } => {
                if !self.has_note() {
                    return Err(ValidationError::EmptyNote);
                }
            }
            AnnotationKind::Highlight { .. } => {}
        }
        Ok(())
    }
}
