//! Render handlers for the demo feed's content types.

use super::surface::{fit, CellSurface};
use super::{DayDivider, ImagePost, TextPost};
use crate::error::DispatchError;
use crate::handler::RenderHandler;
use crate::registry::TypeRegistry;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Styles shared by the feed handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedStyles {
    /// Post author line.
    pub author: Style,
    /// Post body text.
    pub body: Style,
    /// Image frame and caption.
    pub frame: Style,
    /// Day divider rule and label.
    pub divider: Style,
}

impl Default for FeedStyles {
    fn default() -> Self {
        Self {
            author: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            body: Style::default(),
            frame: Style::default().fg(Color::Magenta),
            divider: Style::default().fg(Color::DarkGray),
        }
    }
}

impl FeedStyles {
    /// Styles without colors or modifiers.
    pub fn plain() -> Self {
        Self {
            author: Style::default(),
            body: Style::default(),
            frame: Style::default(),
            divider: Style::default(),
        }
    }
}

/// Renders [`TextPost`]: author line, indented body, blank spacer.
#[derive(Debug, Clone)]
pub struct TextPostHandler {
    width: u16,
    styles: FeedStyles,
}

impl TextPostHandler {
    /// Handler producing surfaces `width` columns wide.
    pub fn new(width: u16, styles: FeedStyles) -> Self {
        Self { width, styles }
    }
}

impl RenderHandler<CellSurface> for TextPostHandler {
    type Content = TextPost;

    fn create_surface(&self) -> CellSurface {
        CellSurface::new(self.width)
    }

    fn bind(&self, surface: &mut CellSurface, content: &TextPost) {
        surface.clear();
        surface.push(Line::from(Span::styled(
            format!("@{}", content.author),
            self.styles.author,
        )));
        surface.push_wrapped(&content.body, 2, self.styles.body);
        surface.push(Line::default());
    }
}

/// Renders [`ImagePost`] as a framed placeholder card.
#[derive(Debug, Clone)]
pub struct ImagePostHandler {
    width: u16,
    styles: FeedStyles,
}

impl ImagePostHandler {
    /// Handler producing surfaces `width` columns wide.
    pub fn new(width: u16, styles: FeedStyles) -> Self {
        Self { width, styles }
    }
}

impl RenderHandler<CellSurface> for ImagePostHandler {
    type Content = ImagePost;

    fn create_surface(&self) -> CellSurface {
        CellSurface::new(self.width)
    }

    fn bind(&self, surface: &mut CellSurface, content: &ImagePost) {
        surface.clear();
        let inner = (self.width as usize).saturating_sub(4);
        let rule = "─".repeat(inner + 2);
        let caption = format!(
            "[image {}x{}] {}",
            content.width,
            content.height,
            content.alt.as_deref().unwrap_or("(no description)")
        );

        let framed = |text: &str| {
            Line::from(Span::styled(
                format!("│ {} │", fit(text, inner)),
                self.styles.frame,
            ))
        };

        surface.push(Line::from(Span::styled(
            format!("┌{rule}┐"),
            self.styles.frame,
        )));
        surface.push(framed(&caption));
        surface.push(framed(&content.url));
        surface.push(Line::from(Span::styled(
            format!("└{rule}┘"),
            self.styles.frame,
        )));
        surface.push(Line::default());
    }
}

/// Renders [`DayDivider`] as a centered date rule.
#[derive(Debug, Clone)]
pub struct DayDividerHandler {
    width: u16,
    styles: FeedStyles,
}

impl DayDividerHandler {
    /// Handler producing surfaces `width` columns wide.
    pub fn new(width: u16, styles: FeedStyles) -> Self {
        Self { width, styles }
    }
}

impl RenderHandler<CellSurface> for DayDividerHandler {
    type Content = DayDivider;

    fn create_surface(&self) -> CellSurface {
        CellSurface::new(self.width)
    }

    fn bind(&self, surface: &mut CellSurface, content: &DayDivider) {
        surface.clear();
        let label = format!(" {} ", content.date.format("%a %d %b %Y"));
        let width = self.width as usize;
        let label_width = label.chars().count();
        let left = width.saturating_sub(label_width) / 2;
        let right = width.saturating_sub(label_width + left);
        surface.push(Line::from(Span::styled(
            format!("{}{label}{}", "─".repeat(left), "─".repeat(right)),
            self.styles.divider,
        )));
        surface.push(Line::default());
    }
}

/// Register the feed handlers in their fixed order: text, image, divider.
///
/// # Errors
///
/// Returns [`DispatchError::Configuration`] if a feed type is already
/// registered and the registry rejects duplicates.
pub fn register_feed_handlers(
    registry: &mut TypeRegistry<CellSurface>,
    width: u16,
    styles: FeedStyles,
) -> Result<(), DispatchError> {
    registry.register(TextPostHandler::new(width, styles))?;
    registry.register(ImagePostHandler::new(width, styles))?;
    registry.register(DayDividerHandler::new(width, styles))?;
    Ok(())
}
