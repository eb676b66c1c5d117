//! Options, statistics, and intermediate types for the export pipeline.

use crate::annotations::{Annotation, AnnotationType};
use crate::query::FilterCriteria;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while validating export options or assembling output.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export title must not be empty")]
    InvalidTitle,

    #[error("Unsupported export format: {0}")]
    InvalidFormat(String),

    #[error("Failed to assemble PDF document: {0}")]
    PdfAssembly(String),
}

impl ExportError {
    /// Stable machine-readable code for API payloads and logs.
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::InvalidTitle => "invalid_title",
            ExportError::InvalidFormat(_) => "invalid_format",
            ExportError::PdfAssembly(_) => "pdf_assembly",
        }
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Output format of an export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(ExportError::InvalidFormat(s.to_string())),
        }
    }
}

/// How annotation dates are rendered inside the exported document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `08/22/2026`
    #[default]
    Short,
    /// `August 22, 2026`
    Long,
    /// `2026-08-22`
    Iso,
}

impl DateFormat {
    pub fn format(&self, date: &DateTime<Utc>) -> String {
        match self {
            DateFormat::Short => date.format("%m/%d/%Y").to_string(),
            DateFormat::Long => date.format("%B %-d, %Y").to_string(),
            DateFormat::Iso => date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Caller-facing knobs for an export run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub book_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_author: Option<String>,
    /// Optional pre-filter applied before anything is rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterCriteria>,
    #[serde(default = "default_true")]
    pub include_toc: bool,
    #[serde(default = "default_true")]
    pub include_stats: bool,
    #[serde(default)]
    pub date_format: DateFormat,
}

fn default_true() -> bool {
    true
}

impl ExportOptions {
    pub fn new(format: ExportFormat, book_title: impl Into<String>) -> Self {
        Self {
            format,
            book_title: book_title.into(),
            book_author: None,
            filters: None,
            include_toc: true,
            include_stats: true,
            date_format: DateFormat::default(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.book_author = Some(author.into());
        self
    }

    pub fn with_filters(mut self, filters: FilterCriteria) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_toc(mut self, include_toc: bool) -> Self {
        self.include_toc = include_toc;
        self
    }

    pub fn with_stats(mut self, include_stats: bool) -> Self {
        self.include_stats = include_stats;
        self
    }

    pub fn with_date_format(mut self, date_format: DateFormat) -> Self {
        self.date_format = date_format;
        self
    }

    /// Rejects options that cannot produce a sensible document.
    pub fn validate(&self) -> ExportResult<()> {
        if self.book_title.trim().is_empty() {
            return Err(ExportError::InvalidTitle);
        }
        Ok(())
    }
}

/// Counts summarizing the annotations that made it into an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    pub total_annotations: usize,
    pub highlights: usize,
    pub notes: usize,
    pub bookmarks: usize,
    pub with_notes: usize,
    pub public_annotations: usize,
    pub export_date: DateTime<Utc>,
}

impl ExportStats {
    /// Tallies `annotations` in a single pass, stamping the current time.
    pub fn collect(annotations: &[Annotation]) -> Self {
        let mut stats = Self {
            total_annotations: annotations.len(),
            highlights: 0,
            notes: 0,
            bookmarks: 0,
            with_notes: 0,
            public_annotations: 0,
            export_date: Utc::now(),
        };
        for annotation in annotations {
            match annotation.annotation_type() {
                AnnotationType::Highlight => stats.highlights += 1,
                AnnotationType::Note => stats.notes += 1,
                AnnotationType::Bookmark => stats.bookmarks += 1,
            }
            if annotation.has_note() {
                stats.with_notes += 1;
            }
            if annotation.is_public {
                stats.public_annotations += 1;
            }
        }
        stats
    }
}

/// One annotation slotted into its export section, with the 1-based index
/// shown next to it in the rendered document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportItem {
    pub index: usize,
    pub annotation: Annotation,
}

/// One non-empty type bucket, in render order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSection {
    pub annotation_type: AnnotationType,
    pub items: Vec<ExportItem>,
}

impl ExportSection {
    /// Section heading, also the table-of-contents label.
    pub fn label(&self) -> &'static str {
        self.annotation_type.plural_label()
    }
}

/// Fully prepared export content, shared by every serializer: filtered,
/// ordered by position, tallied, and grouped by type.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBundle {
    pub stats: ExportStats,
    pub sections: Vec<ExportSection>,
}

impl ExportBundle {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Finished export artifact ready to hand to the caller.
#[derive(Debug, Clone)]
pub struct ExportDocument {
    pub format: ExportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::HighlightColor;

    #[test]
    fn test_format_tokens() {
        assert_eq!("markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!(matches!(
            "epub".parse::<ExportFormat>().unwrap_err(),
            ExportError::InvalidFormat(_)
        ));
        assert_eq!(ExportFormat::Markdown.extension(), "md");
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
    }

    #[test]
    fn test_date_formats() {
        let date = "2026-08-22T10:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(DateFormat::Short.format(&date), "08/22/2026");
        assert_eq!(DateFormat::Long.format(&date), "August 22, 2026");
        assert_eq!(DateFormat::Iso.format(&date), "2026-08-22");
    }

    #[test]
    fn test_options_validate_blank_title() {
        let options = ExportOptions::new(ExportFormat::Markdown, "   ");
        let err = options.validate().unwrap_err();
        assert!(matches!(err, ExportError::InvalidTitle));
        assert_eq!(err.code(), "invalid_title");

        let options = ExportOptions::new(ExportFormat::Markdown, "Real Title");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_options_defaults() {
        let options = ExportOptions::new(ExportFormat::Pdf, "Title");
        assert!(options.include_toc);
        assert!(options.include_stats);
        assert_eq!(options.date_format, DateFormat::Short);
        assert!(options.filters.is_none());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ExportOptions =
            serde_json::from_str(r#"{"format": "markdown", "bookTitle": "My Book"}"#).unwrap();
        assert_eq!(options.format, ExportFormat::Markdown);
        assert!(options.include_toc);
        assert!(options.include_stats);
        assert_eq!(options.date_format, DateFormat::Short);
    }

    #[test]
    fn test_stats_collect() {
        let annotations = vec![
            Annotation::highlight("b", 0, 10, "one", HighlightColor::Yellow).unwrap(),
            Annotation::highlight("b", 20, 30, "two", HighlightColor::Green)
                .unwrap()
                .with_note("has note")
                .with_public(true),
            Annotation::note("b", 40, 50, "note one").unwrap(),
            Annotation::note("b", 60, 70, "note two").unwrap(),
            Annotation::bookmark("b", 80).with_note("bookmark note"),
        ];
        let stats = ExportStats::collect(&annotations);
        assert_eq!(stats.total_annotations, 5);
        assert_eq!(stats.highlights, 2);
        assert_eq!(stats.notes, 2);
        assert_eq!(stats.bookmarks, 1);
        assert_eq!(stats.with_notes, 4);
        assert_eq!(stats.public_annotations, 1);
    }

    #[test]
    fn test_stats_empty_input() {
        let stats = ExportStats::collect(&[]);
        assert_eq!(stats.total_annotations, 0);
        assert_eq!(stats.with_notes, 0);
    }

    #[test]
    fn test_stats_serializes_camel_case() {
        let stats = ExportStats::collect(&[]);
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("totalAnnotations").is_some());
        assert!(json.get("withNotes").is_some());
        assert!(json.get("publicAnnotations").is_some());
        assert!(json.get("exportDate").is_some());
    }
}
