//! Shared preparation stage run before any serializer.

use super::types::{ExportBundle, ExportItem, ExportOptions, ExportResult, ExportSection, ExportStats};
use crate::annotations::{Annotation, AnnotationType};
use crate::query::{filter, sort, SortField, SortSpec};
use tracing::debug;

/// Fixed render order of the type buckets.
const BUCKET_ORDER: [AnnotationType; 3] = [
    AnnotationType::Highlight,
    AnnotationType::Note,
    AnnotationType::Bookmark,
];

/// Runs the common pipeline stage: validate options, apply the optional
/// pre-filter, order by position in the book, tally statistics, and group
/// into type buckets. Empty buckets are dropped; indexes restart at 1 in
/// each bucket.
pub fn prepare(annotations: &[Annotation], options: &ExportOptions) -> ExportResult<ExportBundle> {
    options.validate()?;

    let selected = match &options.filters {
        Some(criteria) => filter(annotations, criteria),
        None => annotations.to_vec(),
    };
    // Reading order, not panel order: exports follow the book.
    let ordered = sort(&selected, &SortSpec::ascending(SortField::StartOffset));

    let stats = ExportStats::collect(&ordered);

    let mut sections = Vec::new();
    for annotation_type in BUCKET_ORDER {
        let items: Vec<ExportItem> = ordered
            .iter()
            .filter(|a| a.annotation_type() == annotation_type)
            .cloned()
            .enumerate()
            .map(|(i, annotation)| ExportItem {
                index: i + 1,
                annotation,
            })
            .collect();
        if !items.is_empty() {
            sections.push(ExportSection {
                annotation_type,
                items,
            });
        }
    }

    debug!(
        total = stats.total_annotations,
        sections = sections.len(),
        "export bundle prepared"
    );

    Ok(ExportBundle { stats, sections })
}
