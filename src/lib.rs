//! Annotation engine for ebook readers.
//!
//! Everything a reading view needs to manage marks on a book: a typed
//! model for highlights, notes, and bookmarks anchored to character
//! offsets; a pure query engine for filtering, sorting, and range lookups;
//! Markdown and PDF export; and persisted panel settings.
//!
//! # Example
//!
//! ```
//! use marginalia::{Annotation, ExportFormat, ExportOptions, HighlightColor};
//!
//! let highlight = Annotation::highlight(
//!     "book-1",
//!     150,
//!     200,
//!     "the quick brown fox",
//!     HighlightColor::Blue,
//! )?;
//!
//! let options = ExportOptions::new(ExportFormat::Markdown, "My Book");
//! let document = marginalia::export(&[highlight], &options)?;
//! assert!(document.filename.ends_with(".md"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod annotations;
pub mod export;
pub mod query;
pub mod settings;

pub use annotations::{
    Annotation, AnnotationCollection, AnnotationKind, AnnotationType, HighlightColor,
    ValidationError,
};
pub use export::{
    export, generate_export_filename, DateFormat, ExportDocument, ExportError, ExportFormat,
    ExportOptions, ExportStats,
};
pub use query::{
    filter, merge_overlapping_ranges, point_lookup, range_overlap, sort, ConfigurationError,
    FilterCriteria, MergedRange, SortDirection, SortField, SortSpec,
};
pub use settings::{
    load_settings, preset_to_filters, save_settings, validate_settings, FilterPreset,
    PanelPosition, PanelSettings, SettingsStore, StorageError,
};
