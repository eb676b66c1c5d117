//! Conjunctive filtering of annotation sequences.

use super::types::FilterCriteria;
use crate::annotations::{Annotation, AnnotationKind};

/// Returns the annotations matching every present field of `criteria`,
/// preserving input order. The input is never mutated.
pub fn filter(annotations: &[Annotation], criteria: &FilterCriteria) -> Vec<Annotation> {
    annotations
        .iter()
        .filter(|a| matches_criteria(a, criteria))
        .cloned()
        .collect()
}

/// Single-annotation predicate behind [`filter`], exposed for callers that
/// stream annotations instead of materializing a slice.
pub fn matches_criteria(annotation: &Annotation, criteria: &FilterCriteria) -> bool {
    if let Some(types) = &criteria.types {
        if !types.contains(&annotation.annotation_type()) {
            return false;
        }
    }

    if let Some(has_note) = criteria.has_note {
        if annotation.has_note() != has_note {
            return false;
        }
    }

    if criteria.public_only && !annotation.is_public {
        return false;
    }

    if let Some(colors) = &criteria.colors {
        match annotation.color() {
            Some(color) if colors.contains(&color) => {}
            _ => return false,
        }
    }

    if let Some(search) = &criteria.search {
        let needle = search.to_lowercase();
        let in_note = annotation
            .note
            .as_deref()
            .map(|note| note.to_lowercase().contains(&needle))
            .unwrap_or(false);
        // Text search only reaches into the selection for highlights; a
        // note's context snippet is incidental and stays out of scope.
        let in_selection = match &annotation.kind {
            AnnotationKind::Highlight { selected_text, .. } => {
                selected_text.to_lowercase().contains(&needle)
            }
            _ => false,
        };
        if !in_note && !in_selection {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{AnnotationType, HighlightColor};

    fn sample_annotations() -> Vec<Annotation> {
        vec![
            Annotation::highlight("book-1", 0, 20, "The Quick Brown Fox", HighlightColor::Yellow)
                .unwrap(),
            Annotation::highlight("book-1", 30, 45, "lazy dog", HighlightColor::Green)
                .unwrap()
                .with_note("idiom")
                .with_public(true),
            Annotation::note("book-1", 60, 80, "A fox also appears here").unwrap(),
            Annotation::bookmark("book-1", 100),
        ]
    }

    #[test]
    fn test_empty_criteria_matches_everything() {
        let annotations = sample_annotations();
        let result = filter(&annotations, &FilterCriteria::any());
        assert_eq!(result.len(), annotations.len());
        // Input order is preserved.
        let ids: Vec<_> = result.iter().map(|a| a.id.as_str()).collect();
        let expected: Vec<_> = annotations.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_filter_by_single_type() {
        let annotations = sample_annotations();
        let criteria = FilterCriteria::any().with_types(vec![AnnotationType::Highlight]);
        let result = filter(&annotations, &criteria);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|a| a.is_highlight()));
    }

    #[test]
    fn test_filter_by_multiple_types() {
        let annotations = sample_annotations();
        let criteria = FilterCriteria::any()
            .with_types(vec![AnnotationType::Note, AnnotationType::Bookmark]);
        let result = filter(&annotations, &criteria);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_filter_by_has_note_both_polarities() {
        let annotations = sample_annotations();

        let with_notes = filter(&annotations, &FilterCriteria::any().with_has_note(true));
        assert_eq!(with_notes.len(), 2);

        // Some(false) demands the absence of a note rather than relaxing
        // the constraint.
        let without_notes = filter(&annotations, &FilterCriteria::any().with_has_note(false));
        assert_eq!(without_notes.len(), 2);
        assert!(without_notes.iter().all(|a| !a.has_note()));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let annotations = sample_annotations();
        let result = filter(&annotations, &FilterCriteria::any().with_search("FOX"));
        // Matches the highlight's selected text and the note's text, but not
        // the bookmark or the green highlight.
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_search_covers_note_text() {
        let annotations = sample_annotations();
        let result = filter(&annotations, &FilterCriteria::any().with_search("idiom"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].color(), Some(HighlightColor::Green));
    }

    #[test]
    fn test_color_filter_excludes_non_highlights() {
        let annotations = sample_annotations();
        let criteria = FilterCriteria::any()
            .with_colors(vec![HighlightColor::Yellow, HighlightColor::Green]);
        let result = filter(&annotations, &criteria);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|a| a.is_highlight()));
    }

    #[test]
    fn test_public_only() {
        let annotations = sample_annotations();
        let result = filter(&annotations, &FilterCriteria::any().public_only());
        assert_eq!(result.len(), 1);
        assert!(result[0].is_public);
    }

    #[test]
    fn test_conjunction_of_fields() {
        let annotations = sample_annotations();
        let criteria = FilterCriteria::any()
            .with_types(vec![AnnotationType::Highlight])
            .with_has_note(true)
            .public_only();
        let result = filter(&annotations, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].selected_text(), Some("lazy dog"));
    }

    #[test]
    fn test_no_match_yields_empty() {
        let annotations = sample_annotations();
        let result = filter(&annotations, &FilterCriteria::any().with_search("zeppelin"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let annotations = sample_annotations();
        let criteria = FilterCriteria::any()
            .with_types(vec![AnnotationType::Highlight, AnnotationType::Note])
            .with_search("fox");
        let once = filter(&annotations, &criteria);
        let twice = filter(&once, &criteria);
        assert_eq!(once, twice);
    }
}
