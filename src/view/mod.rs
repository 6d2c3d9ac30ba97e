//! TUI rendering and terminal management (impure shell)

mod list;
mod status;

pub use list::FeedListWidget;
pub use status::StatusLine;

use crate::adapter::{DispatchAdapter, ItemsSender};
use crate::error::DispatchError;
use crate::feed::CellSurface;
use crate::host::RecyclerList;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Rows reserved below the list for the status line.
const STATUS_HEIGHT: u16 = 1;

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Layout asked the adapter for something it could not provide
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    adapter: DispatchAdapter<CellSurface>,
    list: RecyclerList<CellSurface>,
    show_stats: bool,
    skipped_lines: usize,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(adapter: DispatchAdapter<CellSurface>) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self::with_terminal(terminal, adapter))
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits. Redraws after input, resizes, and item
    /// replacements queued through [`items_sender`](TuiApp::items_sender).
    pub fn run(&mut self) -> Result<(), TuiError> {
        const TICK: Duration = Duration::from_millis(250);

        self.draw()?;

        loop {
            let mut dirty = false;
            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Resize(width, height) => {
                        debug!(width, height, "Terminal resized");
                        dirty = true;
                    }
                    _ => {}
                }
            }

            if self.adapter.apply_pending() {
                dirty = true;
            }
            if dirty {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Wrap an already configured terminal.
    pub fn with_terminal(terminal: Terminal<B>, adapter: DispatchAdapter<CellSurface>) -> Self {
        Self {
            terminal,
            adapter,
            list: RecyclerList::new(0),
            show_stats: false,
            skipped_lines: 0,
        }
    }

    /// Show the recycling stats on the status line from the start.
    pub fn show_stats(mut self, show: bool) -> Self {
        self.show_stats = show;
        self
    }

    /// Report feed lines dropped while parsing on the status line.
    pub fn skipped_lines(mut self, skipped: usize) -> Self {
        self.skipped_lines = skipped;
        self
    }

    /// Handle for replacing the items from another thread.
    pub fn items_sender(&self) -> ItemsSender {
        self.adapter.items_sender()
    }

    /// Apply one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let page = self.list.viewport_height().max(1) as isize;

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('j') | KeyCode::Down => self.list.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.list.scroll_by(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.list.scroll_by(page),
            KeyCode::PageUp => self.list.scroll_by(-page),
            KeyCode::Char('g') | KeyCode::Home => self.list.scroll_to_top(),
            KeyCode::Char('G') | KeyCode::End => self.list.scroll_to_bottom(),
            KeyCode::Char('s') => {
                self.show_stats = !self.show_stats;
                info!(show_stats = self.show_stats, "Stats line toggled");
            }
            _ => {}
        }
        false
    }

    /// Lay out the list for the current terminal size and render a frame.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        self.list
            .set_viewport_height(size.height.saturating_sub(STATUS_HEIGHT) as usize);
        self.list.layout(&self.adapter)?;

        self.terminal.draw(|frame| {
            render(
                frame,
                &self.list,
                self.adapter.item_count(),
                self.skipped_lines,
                self.show_stats,
            )
        })?;
        Ok(())
    }

    /// The list host, for inspecting scroll state and stats.
    pub fn list(&self) -> &RecyclerList<CellSurface> {
        &self.list
    }

    /// The adapter backing the list.
    pub fn adapter(&self) -> &DispatchAdapter<CellSurface> {
        &self.adapter
    }

    /// The underlying terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

fn render(
    frame: &mut Frame,
    list: &RecyclerList<CellSurface>,
    item_count: usize,
    skipped_lines: usize,
    show_stats: bool,
) {
    let [list_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)])
            .areas(frame.area());

    frame.render_widget(FeedListWidget::new(list), list_area);
    frame.render_widget(
        StatusLine::new(list.first_visible(), item_count)
            .skipped_lines(skipped_lines)
            .stats(show_stats.then(|| list.stats())),
        status_area,
    );
}

/// Initialize and run the TUI over `adapter`.
///
/// Handles terminal setup, runs the event loop, and restores the terminal on
/// exit, including when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_with_adapter(
    adapter: DispatchAdapter<CellSurface>,
    show_stats: bool,
    skipped_lines: usize,
) -> Result<(), TuiError> {
    let mut app = TuiApp::new(adapter)?
        .show_stats(show_stats)
        .skipped_lines(skipped_lines);

    let result = app.run();

    restore_terminal()?;

    result
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{register_feed_handlers, FeedStyles, TextPost};
    use crate::item::{ItemsBuilder, ListItem};
    use crate::registry::TypeRegistry;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn create_test_app(posts: usize) -> TuiApp<TestBackend> {
        let mut registry = TypeRegistry::new();
        register_feed_handlers(&mut registry, 20, FeedStyles::plain()).unwrap();
        let mut builder = ItemsBuilder::new(&registry);
        for i in 0..posts {
            builder
                .push_mut(TextPost {
                    author: format!("user{i}"),
                    body: "hi".to_string(),
                })
                .unwrap();
        }
        let items = builder.build();
        let adapter = DispatchAdapter::with_items(Arc::new(registry), items);
        let terminal = Terminal::new(TestBackend::new(20, 7)).unwrap();
        TuiApp::with_terminal(terminal, adapter)
    }

    #[test]
    fn tui_error_from_io_error() {
        let io_err = io::Error::other("test error");
        let tui_err: TuiError = io_err.into();
        assert!(matches!(tui_err, TuiError::Io(_)));
    }

    #[test]
    fn handle_key_q_returns_true() {
        let mut app = create_test_app(1);
        assert!(app.handle_key(key(KeyCode::Char('q'))));
        assert!(app.handle_key(key(KeyCode::Esc)));
    }

    #[test]
    fn handle_key_ctrl_c_returns_true() {
        let mut app = create_test_app(1);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.handle_key(ctrl_c));
    }

    #[test]
    fn handle_key_other_returns_false() {
        let mut app = create_test_app(1);
        assert!(!app.handle_key(key(KeyCode::Char('x'))));
        assert!(!app.handle_key(key(KeyCode::Char('c'))));
    }

    #[test]
    fn draw_sizes_viewport_to_terminal_minus_status() {
        let mut app = create_test_app(5);
        app.draw().unwrap();
        assert_eq!(app.list().viewport_height(), 6);
    }

    #[test]
    fn j_and_k_scroll_one_row() {
        let mut app = create_test_app(5);
        app.draw().unwrap();

        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Down));
        app.draw().unwrap();
        assert_eq!(app.list().scroll_offset(), 2);

        app.handle_key(key(KeyCode::Char('k')));
        app.draw().unwrap();
        assert_eq!(app.list().scroll_offset(), 1);
    }

    #[test]
    fn big_g_then_g_moves_between_ends() {
        let mut app = create_test_app(10);
        app.draw().unwrap();

        app.handle_key(key(KeyCode::Char('G')));
        app.draw().unwrap();
        let last = app.list().attached().last().unwrap();
        assert_eq!(last.position(), 9);
        assert_eq!(app.list().scroll_offset(), app.list().max_scroll());

        app.handle_key(key(KeyCode::Char('g')));
        app.draw().unwrap();
        assert_eq!(app.list().scroll_offset(), 0);
    }

    #[test]
    fn s_toggles_stats_line() {
        let mut app = create_test_app(2);
        app.handle_key(key(KeyCode::Char('s')));
        app.draw().unwrap();

        let buffer = app.terminal().backend().buffer();
        let status: String = (0..20u16).map(|x| buffer[(x, 6u16)].symbol()).collect();
        assert!(status.contains("│ creat"), "status line: {status:?}");
    }

    #[test]
    fn queued_items_replace_list_on_next_apply() {
        let mut app = create_test_app(3);
        app.draw().unwrap();

        let sender = app.items_sender();
        assert!(sender.send(Vec::<ListItem>::new()));
        assert!(app.adapter.apply_pending());
        app.draw().unwrap();

        assert_eq!(app.adapter().item_count(), 0);
        assert!(app.list().attached().is_empty());
    }
}
