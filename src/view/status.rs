//! One-line status bar: position, item count, recycling counters.

use crate::host::RecyclerStats;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Paragraph, Widget},
};

/// Status bar widget.
pub struct StatusLine<'a> {
    first_visible: Option<usize>,
    item_count: usize,
    skipped_lines: usize,
    stats: Option<&'a RecyclerStats>,
}

impl<'a> StatusLine<'a> {
    /// Status for a list of `item_count` items whose top item is `first_visible`.
    pub fn new(first_visible: Option<usize>, item_count: usize) -> Self {
        Self {
            first_visible,
            item_count,
            skipped_lines: 0,
            stats: None,
        }
    }

    /// Report feed lines dropped while parsing.
    pub fn skipped_lines(mut self, skipped: usize) -> Self {
        self.skipped_lines = skipped;
        self
    }

    /// Show surface lifecycle counters.
    pub fn stats(mut self, stats: Option<&'a RecyclerStats>) -> Self {
        self.stats = stats;
        self
    }

    /// The text drawn by [`Widget::render`].
    pub fn text(&self) -> String {
        let position = self.first_visible.map_or(0, |p| p + 1);
        let mut text = format!(" {}/{}", position, self.item_count);

        if self.skipped_lines > 0 {
            text.push_str(&format!(" · {} skipped", self.skipped_lines));
        }

        if let Some(stats) = self.stats {
            text.push_str(&format!(
                " │ created {} · reused {} · binds {}",
                stats.created, stats.reused, stats.binds
            ));
            if stats.recreated > 0 {
                text.push_str(&format!(" · recreated {}", stats.recreated));
            }
        }
        text
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(self.text()))
            .style(Style::default().add_modifier(Modifier::REVERSED))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_shows_zero_of_zero() {
        assert_eq!(StatusLine::new(None, 0).text(), " 0/0");
    }

    #[test]
    fn position_is_one_based() {
        assert_eq!(StatusLine::new(Some(4), 10).text(), " 5/10");
    }

    #[test]
    fn skipped_lines_are_reported() {
        let status = StatusLine::new(Some(0), 3).skipped_lines(2);
        assert_eq!(status.text(), " 1/3 · 2 skipped");
    }

    #[test]
    fn stats_are_appended_when_shown() {
        let mut stats = RecyclerStats::default();
        stats.created = 3;
        stats.reused = 12;
        stats.binds = 15;
        let status = StatusLine::new(Some(0), 3).stats(Some(&stats));
        assert_eq!(
            status.text(),
            " 1/3 │ created 3 · reused 12 · binds 15"
        );
    }

    #[test]
    fn recreations_only_appear_when_nonzero() {
        let mut stats = RecyclerStats::default();
        stats.recreated = 1;
        let text = StatusLine::new(None, 0).stats(Some(&stats)).text();
        assert!(text.ends_with("· recreated 1"), "{text}");
    }
}
