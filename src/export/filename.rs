//! Export filename generation.

use super::types::ExportFormat;
use chrono::Utc;

/// Maximum slug length, keeping filenames well under filesystem limits.
const MAX_SLUG_LEN: usize = 50;

/// Lowercases `title` and collapses every run of characters outside
/// `[a-z0-9]` into a single hyphen, trimming leading and trailing hyphens,
/// then truncates to 50 characters.
pub fn slugify(title: &str) -> String {
    let mut slug = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    slug.truncate(MAX_SLUG_LEN);
    slug
}

/// Builds `{slug}-annotations-{YYYY-MM-DD}.{ext}` from the book title,
/// stamped with the current date.
pub fn generate_export_filename(book_title: &str, format: ExportFormat) -> String {
    format!(
        "{}-annotations-{}.{}",
        slugify(book_title),
        Utc::now().format("%Y-%m-%d"),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Crime and Punishment"), "crime-and-punishment");
        assert_eq!(slugify("Mrs. Dalloway"), "mrs-dalloway");
    }

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("War &&& Peace!!!"), "war-peace");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
    }

    #[test]
    fn test_slugify_strips_non_ascii() {
        assert_eq!(slugify("Les Misérables"), "les-mis-rables");
        assert_eq!(slugify("1984"), "1984");
    }

    #[test]
    fn test_slugify_truncates_to_fifty() {
        let long = "a very long book title that goes on and on and never seems to stop at all";
        let slug = slugify(long);
        assert_eq!(slug.len(), 50);
        assert!(slug.starts_with("a-very-long-book-title"));
    }

    #[test]
    fn test_slugify_degenerate_titles() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_filename_shape() {
        let filename = generate_export_filename("The Name of the Rose", ExportFormat::Markdown);
        assert!(filename.starts_with("the-name-of-the-rose-annotations-"));
        assert!(filename.ends_with(".md"));

        let filename = generate_export_filename("The Name of the Rose", ExportFormat::Pdf);
        assert!(filename.ends_with(".pdf"));
    }

    #[test]
    fn test_filename_embeds_iso_date() {
        let filename = generate_export_filename("Title", ExportFormat::Markdown);
        let date = Utc::now().format("%Y-%m-%d").to_string();
        assert!(filename.contains(&date));
    }
}
