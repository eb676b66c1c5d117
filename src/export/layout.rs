//! Page layout for paginated exports: A4 metrics, greedy word wrapping,
//! and a cursor-based writer that breaks pages before overflow.
//!
//! The writer produces a [`PageDocument`], a plain description of text runs
//! and rules with positions in millimeters. Serializers turn that into
//! actual bytes; tests can assert on it directly.

/// Page geometry and typography, in millimeters and points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMetrics {
    pub page_width: f64,
    pub page_height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub title_size: f64,
    pub heading_size: f64,
    pub body_size: f64,
    pub small_size: f64,
    /// Vertical advance per line of text, in millimeters.
    pub line_height: f64,
}

impl Default for PageMetrics {
    /// A4 portrait with 20 mm margins.
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin_top: 20.0,
            margin_bottom: 20.0,
            margin_left: 20.0,
            margin_right: 20.0,
            title_size: 18.0,
            heading_size: 14.0,
            body_size: 11.0,
            small_size: 9.0,
            line_height: 7.0,
        }
    }
}

impl PageMetrics {
    /// Horizontal space available to text, in millimeters.
    pub fn content_width(&self) -> f64 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Lowest y a line may be drawn at before a page break is required.
    pub fn max_y(&self) -> f64 {
        self.page_height - self.margin_bottom
    }

    /// Estimated characters per line at `font_size`, using an average glyph
    /// width of half the font size. Monospace-grade precision is not the
    /// goal; the estimate only feeds the word wrapper.
    pub fn chars_per_line(&self, font_size: f64) -> usize {
        self.chars_for_width(self.content_width(), font_size)
    }

    /// Same estimate for an arbitrary width, used by indented blocks.
    pub fn chars_for_width(&self, width: f64, font_size: f64) -> usize {
        (width / (font_size * 0.5)).floor() as usize
    }
}

/// Greedy word wrap: words are packed onto a line while they fit within
/// `max_chars`, counting one space between words. Words are never split, so
/// a word longer than `max_chars` occupies a line by itself. Empty input
/// yields no lines.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// One drawing operation on a page. Positions are in millimeters from the
/// top-left corner; text y is the baseline the run is drawn at.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOp {
    Text {
        x: f64,
        y: f64,
        size: f64,
        style: FontStyle,
        text: String,
    },
    Rule {
        x1: f64,
        x2: f64,
        y: f64,
    },
}

impl PageOp {
    pub fn y(&self) -> f64 {
        match self {
            PageOp::Text { y, .. } => *y,
            PageOp::Rule { y, .. } => *y,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<PageOp>,
}

/// Finished layout: every page with its draw operations, plus the metrics
/// they were laid out against.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDocument {
    pub metrics: PageMetrics,
    pub pages: Vec<Page>,
}

impl PageDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Mutable layout cursor. Starts on page 1 at the top margin; every draw
/// call checks remaining space first and breaks to a fresh page when the
/// content would cross the bottom margin.
#[derive(Debug)]
pub struct PageWriter {
    metrics: PageMetrics,
    pages: Vec<Page>,
    y: f64,
}

impl PageWriter {
    pub fn new(metrics: PageMetrics) -> Self {
        Self {
            metrics,
            pages: vec![Page::default()],
            y: metrics.margin_top,
        }
    }

    pub fn metrics(&self) -> &PageMetrics {
        &self.metrics
    }

    /// Current baseline position on the current page.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Zero-based index of the page the cursor is on.
    pub fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    /// Breaks to a new page unless `needed` millimeters still fit above the
    /// bottom margin. A block taller than a whole page draws on a fresh
    /// page and overflows rather than breaking forever.
    pub fn ensure_space(&mut self, needed: f64) {
        if self.y + needed > self.metrics.max_y() && self.y > self.metrics.margin_top {
            self.pages.push(Page::default());
            self.y = self.metrics.margin_top;
        }
    }

    /// Draws one line of text at the cursor and advances by the line height.
    pub fn text_line(&mut self, x: f64, text: &str, size: f64, style: FontStyle) {
        self.ensure_space(self.metrics.line_height);
        let op = PageOp::Text {
            x,
            y: self.y,
            size,
            style,
            text: text.to_string(),
        };
        self.push(op);
        self.y += self.metrics.line_height;
    }

    /// Draws a horizontal rule across the content width and advances.
    pub fn rule(&mut self) {
        self.ensure_space(self.metrics.line_height);
        let op = PageOp::Rule {
            x1: self.metrics.margin_left,
            x2: self.metrics.page_width - self.metrics.margin_right,
            y: self.y,
        };
        self.push(op);
        self.y += self.metrics.line_height;
    }

    /// Adds vertical breathing room without drawing. Overflow is resolved
    /// by the next draw call's space check.
    pub fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    pub fn finish(self) -> PageDocument {
        PageDocument {
            metrics: self.metrics,
            pages: self.pages,
        }
    }

    fn push(&mut self, op: PageOp) {
        // A page always exists; new() seeds the first one.
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_metrics_are_a4() {
        let m = PageMetrics::default();
        assert_eq!(m.page_width, 210.0);
        assert_eq!(m.page_height, 297.0);
        assert_eq!(m.content_width(), 170.0);
        assert_eq!(m.max_y(), 277.0);
    }

    #[test]
    fn test_chars_per_line_scales_with_font_size() {
        let m = PageMetrics::default();
        // 170 / (11 * 0.5) = 30.9 -> 30
        assert_eq!(m.chars_per_line(11.0), 30);
        // 170 / (9 * 0.5) = 37.7 -> 37
        assert_eq!(m.chars_per_line(9.0), 37);
        assert!(m.chars_per_line(18.0) < m.chars_per_line(9.0));
    }

    #[test]
    fn test_wrap_text_packs_greedily() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 15);
        assert_eq!(lines, vec!["the quick brown", "fox jumps over", "the lazy dog"]);
    }

    #[test]
    fn test_wrap_text_exact_fit() {
        // "aa bb" is exactly 5 characters.
        assert_eq!(wrap_text("aa bb cc", 5), vec!["aa bb", "cc"]);
    }

    #[test]
    fn test_wrap_text_never_splits_words() {
        let lines = wrap_text("supercalifragilistic is long", 10);
        assert_eq!(lines, vec!["supercalifragilistic", "is long"]);
    }

    #[test]
    fn test_wrap_text_empty_input() {
        assert!(wrap_text("", 20).is_empty());
        assert!(wrap_text("   ", 20).is_empty());
    }

    #[test]
    fn test_wrap_text_normalizes_whitespace() {
        let lines = wrap_text("one\t two\n  three", 80);
        assert_eq!(lines, vec!["one two three"]);
    }

    #[test]
    fn test_wrap_then_join_reconstructs_text() {
        let text = "a b c d e f g h i j k l m n o p";
        for width in [3, 5, 8, 100] {
            assert_eq!(wrap_text(text, width).join(" "), text);
        }
    }

    #[test]
    fn test_writer_starts_at_top_margin() {
        let writer = PageWriter::new(PageMetrics::default());
        assert_eq!(writer.y(), 20.0);
        assert_eq!(writer.page_index(), 0);
    }

    #[test]
    fn test_writer_breaks_page_before_overflow() {
        let metrics = PageMetrics::default();
        let mut writer = PageWriter::new(metrics);
        // (277 - 20) / 7 = 36.7, so 36 lines fit on the first page.
        for i in 0..40 {
            writer.text_line(20.0, &format!("line {i}"), 11.0, FontStyle::Regular);
        }
        let doc = writer.finish();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[0].ops.len(), 36);
        assert_eq!(doc.pages[1].ops.len(), 4);

        for page in &doc.pages {
            for op in &page.ops {
                assert!(op.y() >= metrics.margin_top);
                assert!(op.y() + metrics.line_height <= metrics.max_y() + 1e-9);
            }
        }
    }

    #[test]
    fn test_ensure_space_triggers_break_only_when_needed() {
        let metrics = PageMetrics::default();
        let mut writer = PageWriter::new(metrics);
        writer.text_line(20.0, "first", 11.0, FontStyle::Regular);
        writer.ensure_space(10.0);
        assert_eq!(writer.page_index(), 0);
        writer.ensure_space(1000.0);
        assert_eq!(writer.page_index(), 1);
        assert_eq!(writer.y(), metrics.margin_top);
    }

    #[test]
    fn test_ensure_space_at_top_of_page_never_loops() {
        let mut writer = PageWriter::new(PageMetrics::default());
        // Taller than a page, requested while already at the top margin.
        writer.ensure_space(1000.0);
        assert_eq!(writer.page_index(), 0);
    }

    #[test]
    fn test_rule_spans_content_width() {
        let metrics = PageMetrics::default();
        let mut writer = PageWriter::new(metrics);
        writer.rule();
        let doc = writer.finish();
        assert_eq!(
            doc.pages[0].ops[0],
            PageOp::Rule {
                x1: 20.0,
                x2: 190.0,
                y: 20.0
            }
        );
    }

    #[test]
    fn test_advance_adds_space_without_drawing() {
        let mut writer = PageWriter::new(PageMetrics::default());
        writer.advance(12.0);
        assert_eq!(writer.y(), 32.0);
        let doc = writer.finish();
        assert!(doc.pages[0].ops.is_empty());
    }
}
