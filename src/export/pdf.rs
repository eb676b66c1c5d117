//! PDF serialization of a prepared export bundle.
//!
//! Rendering happens in two passes: [`lay_out`] walks the bundle through a
//! [`PageWriter`] to produce a position-resolved [`PageDocument`], and
//! [`emit`] turns that into PDF bytes with `lopdf`. Keeping the passes
//! separate lets tests assert on positions without parsing PDF output.

use super::layout::{wrap_text, FontStyle, PageDocument, PageMetrics, PageOp, PageWriter};
use super::types::{ExportBundle, ExportError, ExportOptions, ExportResult};
use crate::annotations::AnnotationKind;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

const MM_TO_PT: f64 = 72.0 / 25.4;

/// Indent of item content relative to the left margin, in millimeters.
const CONTENT_INDENT: f64 = 6.0;
/// Deeper indent for attached note blocks.
const NOTE_INDENT: f64 = 12.0;

/// Renders the bundle to PDF bytes on default A4 metrics.
pub fn render_pdf(bundle: &ExportBundle, options: &ExportOptions) -> ExportResult<Vec<u8>> {
    let layout = lay_out(bundle, options, PageMetrics::default());
    emit(&layout)
}

/// Lays the bundle out into pages: title block, optional statistics,
/// one section per bucket with a closing divider, and a footer line.
pub fn lay_out(
    bundle: &ExportBundle,
    options: &ExportOptions,
    metrics: PageMetrics,
) -> PageDocument {
    let mut writer = PageWriter::new(metrics);
    let left = metrics.margin_left;

    for line in wrap_text(
        options.book_title.trim(),
        metrics.chars_per_line(metrics.title_size),
    ) {
        writer.text_line(left, &line, metrics.title_size, FontStyle::Bold);
    }
    if let Some(author) = &options.book_author {
        writer.text_line(left, &format!("by {author}"), metrics.body_size, FontStyle::Regular);
    }
    writer.advance(2.0);
    writer.rule();
    writer.advance(2.0);

    if options.include_stats {
        let stats = &bundle.stats;
        let rows = [
            format!("Total annotations: {}", stats.total_annotations),
            format!("Highlights: {}", stats.highlights),
            format!("Notes: {}", stats.notes),
            format!("Bookmarks: {}", stats.bookmarks),
            format!("With notes: {}", stats.with_notes),
            format!("Public: {}", stats.public_annotations),
        ];
        // The block draws as one unit, so reserve its full height up front.
        writer.ensure_space((rows.len() as f64 + 1.0) * metrics.line_height);
        writer.text_line(left, "Statistics", metrics.heading_size, FontStyle::Bold);
        for row in &rows {
            writer.text_line(left + CONTENT_INDENT, row, metrics.body_size, FontStyle::Regular);
        }
        writer.advance(2.0);
    }

    for section in &bundle.sections {
        writer.ensure_space(2.0 * metrics.line_height);
        writer.text_line(left, section.label(), metrics.heading_size, FontStyle::Bold);
        writer.advance(1.0);

        for item in &section.items {
            let annotation = &item.annotation;
            let date = options.date_format.format(&annotation.created_at);
            let body_chars = metrics.chars_per_line(metrics.body_size);
            let note_chars =
                metrics.chars_for_width(metrics.content_width() - NOTE_INDENT, metrics.body_size);

            // Keep the header on the same page as the first content line.
            writer.ensure_space(2.0 * metrics.line_height);
            writer.text_line(
                left,
                &format!("{}. {}", item.index, annotation.annotation_type().label()),
                metrics.body_size,
                FontStyle::Bold,
            );

            let metadata = match &annotation.kind {
                AnnotationKind::Highlight {
                    selected_text,
                    color,
                } => {
                    for line in wrap_text(selected_text, body_chars) {
                        writer.text_line(
                            left + CONTENT_INDENT,
                            &line,
                            metrics.body_size,
                            FontStyle::Regular,
                        );
                    }
                    if let Some(note) = &annotation.note {
                        for line in wrap_text(&format!("Note: {note}"), note_chars) {
                            writer.text_line(
                                left + NOTE_INDENT,
                                &line,
                                metrics.body_size,
                                FontStyle::Regular,
                            );
                        }
                    }
                    format!("{} - {}", date, color)
                }
                AnnotationKind::Note { context } => {
                    if let Some(note) = &annotation.note {
                        for line in wrap_text(note, body_chars) {
                            writer.text_line(
                                left + CONTENT_INDENT,
                                &line,
                                metrics.body_size,
                                FontStyle::Regular,
                            );
                        }
                    }
                    if let Some(context) = context {
                        for line in wrap_text(&format!("\"{context}\""), note_chars) {
                            writer.text_line(
                                left + NOTE_INDENT,
                                &line,
                                metrics.body_size,
                                FontStyle::Regular,
                            );
                        }
                    }
                    date.clone()
                }
                AnnotationKind::Bookmark => {
                    writer.text_line(
                        left + CONTENT_INDENT,
                        &format!("Position {}", annotation.start_offset),
                        metrics.body_size,
                        FontStyle::Regular,
                    );
                    if let Some(note) = &annotation.note {
                        for line in wrap_text(&format!("Note: {note}"), note_chars) {
                            writer.text_line(
                                left + NOTE_INDENT,
                                &line,
                                metrics.body_size,
                                FontStyle::Regular,
                            );
                        }
                    }
                    date.clone()
                }
            };
            writer.text_line(left + CONTENT_INDENT, &metadata, metrics.small_size, FontStyle::Regular);
            writer.advance(2.0);
        }

        writer.advance(1.0);
        writer.rule();
        writer.advance(2.0);
    }

    writer.ensure_space(metrics.line_height);
    writer.text_line(
        left,
        &format!(
            "Exported on {}",
            bundle.stats.export_date.format("%Y-%m-%d %H:%M UTC")
        ),
        metrics.small_size,
        FontStyle::Regular,
    );

    writer.finish()
}

/// Assembles the laid-out pages into a PDF document with embedded
/// Helvetica base fonts.
pub fn emit(layout: &PageDocument) -> ExportResult<Vec<u8>> {
    let metrics = &layout.metrics;
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding"
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding"
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id
        }
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let mut operations = Vec::new();
        for op in &page.ops {
            match op {
                PageOp::Text {
                    x,
                    y,
                    size,
                    style,
                    text,
                } => {
                    let font = match style {
                        FontStyle::Regular => "F1",
                        FontStyle::Bold => "F2",
                    };
                    operations.push(Operation::new("BT", vec![]));
                    operations.push(Operation::new(
                        "Tf",
                        vec![font.into(), (*size as f32).into()],
                    ));
                    operations.push(Operation::new(
                        "Td",
                        vec![to_pt(*x), to_pt_y(metrics, *y)],
                    ));
                    operations.push(Operation::new(
                        "Tj",
                        vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                    ));
                    operations.push(Operation::new("ET", vec![]));
                }
                PageOp::Rule { x1, x2, y } => {
                    operations.push(Operation::new("w", vec![0.4f32.into()]));
                    operations.push(Operation::new(
                        "m",
                        vec![to_pt(*x1), to_pt_y(metrics, *y)],
                    ));
                    operations.push(Operation::new(
                        "l",
                        vec![to_pt(*x2), to_pt_y(metrics, *y)],
                    ));
                    operations.push(Operation::new("S", vec![]));
                }
            }
        }

        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::PdfAssembly(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            ((metrics.page_width * MM_TO_PT) as f32).into(),
            ((metrics.page_height * MM_TO_PT) as f32).into()
        ]
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::PdfAssembly(e.to_string()))?;
    Ok(bytes)
}

fn to_pt(mm: f64) -> Object {
    ((mm * MM_TO_PT) as f32).into()
}

/// Converts a top-down layout y to the PDF bottom-up coordinate space.
fn to_pt_y(metrics: &PageMetrics, y: f64) -> Object {
    (((metrics.page_height - y) * MM_TO_PT) as f32).into()
}

/// Best-effort WinAnsi encoding: code points above the Latin-1 range have
/// no slot in the base-font encoding and degrade to `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xff {
                code as u8
            } else {
                b'?'
            }
        })
        .collect()
}
