//! Annotation export pipeline.
//!
//! Every export runs the same preparation stage (validate, filter, order,
//! tally, group) and then hands the bundle to a format serializer:
//!
//! - [`render_markdown`] produces an escaped Markdown document
//! - [`render_pdf`] lays text out on A4 pages and assembles PDF bytes
//!
//! [`export`] ties the stages together and names the output file.

mod filename;
mod layout;
mod markdown;
mod pdf;
mod prepare;
mod types;

pub use filename::{generate_export_filename, slugify};
pub use layout::{wrap_text, FontStyle, Page, PageDocument, PageMetrics, PageOp, PageWriter};
pub use markdown::{escape_markdown, render_markdown};
pub use pdf::{lay_out, render_pdf};
pub use prepare::prepare;
pub use types::{
    DateFormat, ExportBundle, ExportDocument, ExportError, ExportFormat, ExportItem,
    ExportOptions, ExportResult, ExportSection, ExportStats,
};

use crate::annotations::Annotation;
use tracing::debug;

/// Exports `annotations` as a downloadable document in the requested
/// format. Never mutates the input; the caller's collection is read once.
pub fn export(annotations: &[Annotation], options: &ExportOptions) -> ExportResult<ExportDocument> {
    debug!(
        format = %options.format,
        count = annotations.len(),
        "starting annotation export"
    );

    let bundle = prepare(annotations, options)?;
    let bytes = match options.format {
        ExportFormat::Markdown => render_markdown(&bundle, options).into_bytes(),
        ExportFormat::Pdf => render_pdf(&bundle, options)?,
    };
    let filename = generate_export_filename(&options.book_title, options.format);

    debug!(
        filename = %filename,
        bytes = bytes.len(),
        "annotation export finished"
    );

    Ok(ExportDocument {
        format: options.format,
        filename,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{Annotation, HighlightColor};

    fn sample_annotations() -> Vec<Annotation> {
        vec![
            Annotation::highlight("book-1", 0, 20, "selected text", HighlightColor::Blue).unwrap(),
            Annotation::note("book-1", 40, 60, "a note").unwrap(),
        ]
    }

    #[test]
    fn test_export_markdown_document() {
        let options = ExportOptions::new(ExportFormat::Markdown, "A Book");
        let document = export(&sample_annotations(), &options).unwrap();

        assert_eq!(document.format, ExportFormat::Markdown);
        assert!(document.filename.starts_with("a-book-annotations-"));
        assert!(document.filename.ends_with(".md"));
        let text = String::from_utf8(document.bytes).unwrap();
        assert!(text.contains("# A Book"));
    }

    #[test]
    fn test_export_pdf_document() {
        let options = ExportOptions::new(ExportFormat::Pdf, "A Book");
        let document = export(&sample_annotations(), &options).unwrap();

        assert_eq!(document.format, ExportFormat::Pdf);
        assert!(document.filename.ends_with(".pdf"));
        assert!(document.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_export_propagates_option_errors() {
        let options = ExportOptions::new(ExportFormat::Markdown, "  ");
        let err = export(&sample_annotations(), &options).unwrap_err();
        assert_eq!(err.code(), "invalid_title");
    }

    #[test]
    fn test_export_leaves_input_untouched() {
        let annotations = sample_annotations();
        let before = annotations.clone();
        let options = ExportOptions::new(ExportFormat::Markdown, "A Book");
        let _ = export(&annotations, &options).unwrap();
        assert_eq!(annotations, before);
    }
}
