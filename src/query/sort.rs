//! Stable ordering of annotation sequences.

use super::types::{SortDirection, SortField, SortSpec};
use crate::annotations::Annotation;
use std::cmp::Ordering;

/// Returns a sorted copy of `annotations`. The sort is stable: equal keys
/// keep their input order, in both directions.
pub fn sort(annotations: &[Annotation], spec: &SortSpec) -> Vec<Annotation> {
    let mut sorted = annotations.to_vec();
    sorted.sort_by(|a, b| compare(a, b, spec));
    sorted
}

/// Comparator behind [`sort`]. Descending order reverses the comparator
/// rather than the output, which is what keeps ties stable.
pub fn compare(a: &Annotation, b: &Annotation, spec: &SortSpec) -> Ordering {
    let ordering = match spec.field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::StartOffset => a.start_offset.cmp(&b.start_offset),
        SortField::Type => a
            .annotation_type()
            .as_str()
            .cmp(b.annotation_type().as_str()),
    };
    match spec.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}
