//! Annotation data model: highlights, notes, and bookmarks anchored to
//! character-offset ranges of a book, plus a per-book collection with
//! validated inserts and edits.

mod collection;
mod types;

pub use collection::AnnotationCollection;
pub use types::{
    Annotation, AnnotationKind, AnnotationType, HighlightColor, ValidationError, ValidationResult,
};
