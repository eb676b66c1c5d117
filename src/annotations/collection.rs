//! In-memory annotation set for a single book.

use super::types::{Annotation, ValidationError, ValidationResult};
use chrono::Utc;
use tracing::debug;

/// All annotations belonging to one book, keyed by id.
///
/// Iteration order is insertion order, which keeps snapshots deterministic
/// for callers that do their own sorting.
#[derive(Debug, Clone, Default)]
pub struct AnnotationCollection {
    book_id: String,
    entries: Vec<Annotation>,
}

impl AnnotationCollection {
    pub fn new(book_id: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            entries: Vec::new(),
        }
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds an annotation after validating it. Rejects annotations for a
    /// different book and duplicate ids.
    pub fn insert(&mut self, annotation: Annotation) -> ValidationResult<()> {
        annotation.validate()?;
        if annotation.book_id != self.book_id {
            return Err(ValidationError::BookMismatch {
                expected: self.book_id.clone(),
                found: annotation.book_id,
            });
        }
        if self.entries.iter().any(|a| a.id == annotation.id) {
            return Err(ValidationError::DuplicateId(annotation.id));
        }
        debug!(id = %annotation.id, kind = %annotation.annotation_type(), "annotation added");
        self.entries.push(annotation);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Annotation> {
        self.entries.iter().find(|a| a.id == id)
    }

    /// Applies `mutate` to the annotation with `id`, then re-validates.
    /// The stored annotation is untouched when validation fails, so an
    /// invalid edit can never be persisted. Returns `Ok(false)` when no
    /// annotation has that id.
    pub fn update(
        &mut self,
        id: &str,
        mutate: impl FnOnce(&mut Annotation),
    ) -> ValidationResult<bool> {
        let Some(slot) = self.entries.iter_mut().find(|a| a.id == id) else {
            return Ok(false);
        };
        let mut candidate = slot.clone();
        mutate(&mut candidate);
        candidate.validate()?;
        candidate.updated_at = Utc::now();
        *slot = candidate;
        Ok(true)
    }

    /// Removes the annotation with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|a| a.id != id);
        before != self.entries.len()
    }

    /// Snapshot of the collection in insertion order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::types::HighlightColor;

    fn sample_collection() -> AnnotationCollection {
        let mut collection = AnnotationCollection::new("book-1");
        collection
            .insert(
                Annotation::highlight("book-1", 10, 50, "first passage", HighlightColor::Yellow)
                    .unwrap(),
            )
            .unwrap();
        collection
            .insert(Annotation::note("book-1", 100, 120, "a margin note").unwrap())
            .unwrap();
        collection
    }

    #[test]
    fn test_insert_and_get() {
        let collection = sample_collection();
        assert_eq!(collection.len(), 2);

        let id = collection.annotations()[0].id.clone();
        let found = collection.get(&id).unwrap();
        assert_eq!(found.selected_text(), Some("first passage"));
        assert!(collection.get("missing").is_none());
    }

    #[test]
    fn test_insert_rejects_wrong_book() {
        let mut collection = sample_collection();
        let stray = Annotation::bookmark("book-2", 5);
        assert_eq!(
            collection.insert(stray).unwrap_err(),
            ValidationError::BookMismatch {
                expected: "book-1".to_string(),
                found: "book-2".to_string(),
            }
        );
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut collection = sample_collection();
        let duplicate = collection.annotations()[0].clone();
        assert!(matches!(
            collection.insert(duplicate).unwrap_err(),
            ValidationError::DuplicateId(_)
        ));
    }

    #[test]
    fn test_insert_rejects_invalid_annotation() {
        let mut collection = sample_collection();
        let mut broken = Annotation::bookmark("book-1", 10);
        broken.end_offset = 20;
        assert_eq!(
            collection.insert(broken).unwrap_err(),
            ValidationError::BookmarkSpan { start: 10, end: 20 }
        );
    }

    #[test]
    fn test_update_revalidates_and_bumps_timestamp() {
        let mut collection = sample_collection();
        let id = collection.annotations()[0].id.clone();
        let created_at = collection.get(&id).unwrap().created_at;

        let changed = collection
            .update(&id, |a| a.set_color(HighlightColor::Green))
            .unwrap();
        assert!(changed);

        let updated = collection.get(&id).unwrap();
        assert_eq!(updated.color(), Some(HighlightColor::Green));
        assert!(updated.updated_at >= created_at);
    }

    #[test]
    fn test_update_rejects_invalid_edit_and_keeps_original() {
        let mut collection = sample_collection();
        let id = collection.annotations()[1].id.clone();

        let result = collection.update(&id, |a| a.set_note(None));
        assert_eq!(result.unwrap_err(), ValidationError::EmptyNote);

        // The stored note survived the failed edit.
        assert_eq!(
            collection.get(&id).unwrap().note.as_deref(),
            Some("a margin note")
        );
    }

    #[test]
    fn test_update_missing_id_returns_false() {
        let mut collection = sample_collection();
        assert!(!collection.update("missing", |_| {}).unwrap());
    }

    #[test]
    fn test_remove() {
        let mut collection = sample_collection();
        let id = collection.annotations()[0].id.clone();
        assert!(collection.remove(&id));
        assert!(!collection.remove(&id));
        assert_eq!(collection.len(), 1);
    }
}
