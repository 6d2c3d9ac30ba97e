//! Widget drawing the recycler's attached surfaces.

use crate::feed::CellSurface;
use crate::host::RecyclerList;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Draws every attached surface at its viewport row, clipped to the area.
///
/// The recycler decides what is visible; this widget only copies lines.
pub struct FeedListWidget<'a> {
    list: &'a RecyclerList<CellSurface>,
}

impl<'a> FeedListWidget<'a> {
    /// Widget over the surfaces attached by the last layout of `list`.
    pub fn new(list: &'a RecyclerList<CellSurface>) -> Self {
        Self { list }
    }
}

impl Widget for FeedListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for attached in self.list.attached() {
            let lines = attached.surface().get().lines();
            for (offset, line) in lines.iter().skip(attached.skip()).enumerate() {
                let row = attached.row() + offset;
                if row >= area.height as usize {
                    return;
                }
                buf.set_line(area.x, area.y + row as u16, line, area.width);
            }
        }
    }
}
