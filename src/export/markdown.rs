//! Markdown serialization of a prepared export bundle.

use super::types::{ExportBundle, ExportOptions};
use crate::annotations::AnnotationKind;

/// Escapes Markdown syntax characters with a leading backslash so
/// user-supplied text renders literally. Runs in a single pass; already
/// escaped input gets escaped again.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '{' | '}' | '[' | ']' | '(' | ')' | '#' | '+' | '-' | '.'
            | '!' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the bundle as a Markdown document: header, optional statistics
/// block, optional table of contents, one section per non-empty bucket,
/// and a footer with the export timestamp.
pub fn render_markdown(bundle: &ExportBundle, options: &ExportOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {}", escape_markdown(options.book_title.trim())));
    lines.push(String::new());

    if let Some(author) = &options.book_author {
        lines.push(format!("**Author:** {}", escape_markdown(author)));
        lines.push(String::new());
    }

    if options.include_stats {
        let stats = &bundle.stats;
        lines.push("## Statistics".to_string());
        lines.push(String::new());
        lines.push(format!("- **Total annotations:** {}", stats.total_annotations));
        lines.push(format!("- **Highlights:** {}", stats.highlights));
        lines.push(format!("- **Notes:** {}", stats.notes));
        lines.push(format!("- **Bookmarks:** {}", stats.bookmarks));
        lines.push(format!("- **With notes:** {}", stats.with_notes));
        lines.push(format!("- **Public:** {}", stats.public_annotations));
        lines.push(String::new());
    }

    if options.include_toc && !bundle.sections.is_empty() {
        lines.push("## Contents".to_string());
        lines.push(String::new());
        for section in &bundle.sections {
            lines.push(format!(
                "- [{}](#{}) ({})",
                section.label(),
                section.label().to_lowercase(),
                section.items.len()
            ));
        }
        lines.push(String::new());
    }

    for section in &bundle.sections {
        lines.push(format!("## {}", section.label()));
        lines.push(String::new());

        for item in &section.items {
            let annotation = &item.annotation;
            let date = options.date_format.format(&annotation.created_at);
            lines.push(format!(
                "### {}. {}",
                item.index,
                annotation.annotation_type().label()
            ));
            lines.push(String::new());

            match &annotation.kind {
                AnnotationKind::Highlight {
                    selected_text,
                    color,
                } => {
                    lines.push(format!("> {}", escape_markdown(selected_text)));
                    lines.push(String::new());
                    lines.push(format!("**Color:** {} | **Date:** {}", color, date));
                    if let Some(note) = &annotation.note {
                        lines.push(format!("**Note:** {}", escape_markdown(note)));
                    }
                }
                AnnotationKind::Note { context } => {
                    if let Some(note) = &annotation.note {
                        lines.push(escape_markdown(note));
                        lines.push(String::new());
                    }
                    if let Some(context) = context {
                        lines.push(format!("> {}", escape_markdown(context)));
                        lines.push(String::new());
                    }
                    lines.push(format!("**Date:** {}", date));
                }
                AnnotationKind::Bookmark => {
                    lines.push(format!(
                        "**Position:** {} | **Date:** {}",
                        annotation.start_offset, date
                    ));
                    if let Some(note) = &annotation.note {
                        lines.push(format!("**Note:** {}", escape_markdown(note)));
                    }
                }
            }
            lines.push(String::new());
        }
    }

    lines.push("---".to_string());
    lines.push(String::new());
    lines.push(format!(
        "*Exported on {}*",
        bundle.stats.export_date.format("%Y-%m-%d %H:%M UTC")
    ));

    let mut document = lines.join("\n");
    document.push('\n');
    document
}
