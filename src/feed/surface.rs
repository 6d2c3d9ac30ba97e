//! Terminal cell surface and text fitting helpers.

use crate::host::Measure;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A fixed-width block of styled terminal lines.
///
/// Created empty by a handler and refilled on every bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSurface {
    width: u16,
    lines: Vec<Line<'static>>,
}

impl CellSurface {
    /// Create an empty surface `width` columns wide.
    pub fn new(width: u16) -> Self {
        Self {
            width,
            lines: Vec::new(),
        }
    }

    /// Width in columns.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Lines written by the last bind.
    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    /// Drop all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Append a line as-is.
    pub fn push(&mut self, line: Line<'static>) {
        self.lines.push(line);
    }

    /// Append `text` word-wrapped to `width - indent` columns, each line
    /// prefixed with `indent` spaces.
    pub fn push_wrapped(&mut self, text: &str, indent: usize, style: Style) {
        let available = (self.width as usize).saturating_sub(indent);
        let pad = " ".repeat(indent);
        for row in wrap(text, available) {
            self.lines.push(Line::from(vec![
                Span::raw(pad.clone()),
                Span::styled(row, style),
            ]));
        }
    }

    /// Plain text of every line, for tests and logs.
    pub fn text(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }
}

impl Measure for CellSurface {
    fn height(&self) -> usize {
        self.lines.len()
    }
}

/// Word-wrap `text` to `width` display columns.
///
/// Explicit newlines are kept (blank lines included). Words wider than
/// `width` are split. Always returns at least one line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for raw in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for word in raw.split_whitespace() {
            let mut rest = word;
            while !rest.is_empty() {
                let w = rest.width();
                let needed = if current.is_empty() {
                    w
                } else {
                    current_width + 1 + w
                };
                if needed <= width {
                    if !current.is_empty() {
                        current.push(' ');
                        current_width += 1;
                    }
                    current.push_str(rest);
                    current_width += w;
                    break;
                }
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                    current_width = 0;
                    continue;
                }
                let (head, tail) = split_at_width(rest, width);
                out.push(head.to_string());
                rest = tail;
            }
        }
        out.push(current);
    }

    if out.is_empty() {
        out.push(String::new());
    }
    out
}

/// Truncate `text` to `width` columns and pad it with spaces to exactly `width`.
pub fn fit(text: &str, width: usize) -> String {
    let (head, _) = split_at_width(text, width);
    let mut fitted = head.to_string();
    let pad = width.saturating_sub(fitted.width());
    fitted.extend(std::iter::repeat(' ').take(pad));
    fitted
}

/// Split `s` after at most `width` columns, keeping at least one char in the head.
fn split_at_width(s: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let cw = c.width().unwrap_or(0);
        if used + cw > width && idx > 0 {
            return s.split_at(idx);
        }
        used += cw;
    }
    s.split_at(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_fits_words_to_width() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn wrap_keeps_explicit_newlines() {
        assert_eq!(wrap("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn wrap_splits_overlong_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_empty_text_yields_one_blank_line() {
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn wrap_counts_display_width() {
        // Each CJK char is two columns wide.
        assert_eq!(wrap("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn wrap_zero_width_still_progresses() {
        assert_eq!(wrap("ab", 0), vec!["a", "b"]);
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abcd");
    }

    #[test]
    fn push_wrapped_indents_each_row() {
        let mut surface = CellSurface::new(8);
        surface.push_wrapped("one two three", 2, Style::default());
        assert_eq!(surface.text(), vec!["  one", "  two", "  three"]);
        assert_eq!(surface.height(), 3);
    }

    #[test]
    fn clear_empties_surface() {
        let mut surface = CellSurface::new(8);
        surface.push(Line::from("x"));
        surface.clear();
        assert!(surface.lines().is_empty());
        assert_eq!(surface.width(), 8);
    }
}
