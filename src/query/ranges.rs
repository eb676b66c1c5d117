//! Range queries over annotation offsets: overlap tests, point lookup, and
//! merging of overlapping highlight ranges for rendering.

use super::types::MergedRange;
use crate::annotations::Annotation;

/// Returns the annotations whose range overlaps `start..end`, in input order.
///
/// Overlap is open-interval: `a.start < end && a.end > start`. Touching
/// ranges do not overlap, and zero-width bookmarks never match; use
/// [`point_lookup`] for point hits.
pub fn range_overlap(annotations: &[Annotation], start: usize, end: usize) -> Vec<Annotation> {
    annotations
        .iter()
        .filter(|a| a.start_offset < end && a.end_offset > start)
        .cloned()
        .collect()
}

/// Returns the first annotation (in input order) whose range contains
/// `offset`, with both endpoints inclusive so a bookmark is hit at exactly
/// its own offset.
pub fn point_lookup(annotations: &[Annotation], offset: usize) -> Option<&Annotation> {
    annotations
        .iter()
        .find(|a| a.start_offset <= offset && offset <= a.end_offset)
}

/// Collapses overlapping highlight ranges into maximal merged runs for
/// rendering a single layer of highlight rectangles.
///
/// Only highlights participate; notes and bookmarks are ignored. Ranges
/// that merely touch (`next.start == current.end`) are merged. The result
/// is ordered by start offset and each run carries every contributing
/// annotation id.
pub fn merge_overlapping_ranges(annotations: &[Annotation]) -> Vec<MergedRange> {
    let mut highlights: Vec<&Annotation> = annotations.iter().filter(|a| a.is_highlight()).collect();
    highlights.sort_by(|a, b| {
        a.start_offset
            .cmp(&b.start_offset)
            .then(a.end_offset.cmp(&b.end_offset))
    });

    let mut merged: Vec<MergedRange> = Vec::new();
    for highlight in highlights {
        match merged.last_mut() {
            Some(current) if highlight.start_offset <= current.end_offset => {
                current.end_offset = current.end_offset.max(highlight.end_offset);
                current.annotation_ids.push(highlight.id.clone());
            }
            _ => merged.push(MergedRange {
                start_offset: highlight.start_offset,
                end_offset: highlight.end_offset,
                annotation_ids: vec![highlight.id.clone()],
            }),
        }
    }
    merged
}
