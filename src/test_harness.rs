//! Acceptance test harness for TUI testing
//!
//! Wraps `TuiApp<TestBackend>` with helpers for loading a feed, sending keys
//! and rendering frames to strings.

use crate::adapter::{DispatchAdapter, MismatchPolicy};
use crate::feed::{parse_feed, register_feed_handlers, FeedStyles};
use crate::registry::TypeRegistry;
use crate::view::TuiApp;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::sync::Arc;

/// Convert a ratatui buffer to a string representation for snapshot testing.
///
/// Trailing spaces are trimmed and blank rows dropped to keep snapshots clean.
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

/// Test harness for acceptance testing
pub struct FeedTestHarness {
    app: TuiApp<TestBackend>,
    running: bool,
}

impl FeedTestHarness {
    /// Parse `jsonl` and show it on a `width` x `height` terminal, with
    /// surfaces as wide as the terminal.
    pub fn from_jsonl(jsonl: &str, width: u16, height: u16) -> Self {
        let mut registry = TypeRegistry::new();
        register_feed_handlers(&mut registry, width, FeedStyles::plain())
            .expect("feed handlers register");

        let parsed = parse_feed(jsonl.as_bytes()).expect("in-memory read cannot fail");
        let skipped = parsed.skipped.len();
        let items = parsed.into_items(&registry).expect("feed types are registered");

        let adapter = DispatchAdapter::with_items(Arc::new(registry), items)
            .with_mismatch_policy(MismatchPolicy::Fail);
        let terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");

        Self {
            app: TuiApp::with_terminal(terminal, adapter).skipped_lines(skipped),
            running: true,
        }
    }

    /// Send a single key. Returns `true` if the app quit.
    pub fn send_key(&mut self, key: KeyCode) -> bool {
        self.send_key_with_mods(key, KeyModifiers::NONE)
    }

    /// Send key with modifiers (e.g., Ctrl+C)
    pub fn send_key_with_mods(&mut self, key: KeyCode, mods: KeyModifiers) -> bool {
        if !self.running {
            return true;
        }

        // Keys act on the viewport of the last frame.
        self.app.draw().expect("draw before key");
        let quit = self.app.handle_key(KeyEvent::new(key, mods));
        if quit {
            self.running = false;
        }
        quit
    }

    /// Send a sequence of keys, stopping at a quit.
    pub fn send_keys(&mut self, keys: &[KeyCode]) {
        for key in keys {
            if self.send_key(*key) {
                break;
            }
        }
    }

    /// Check if app is still running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Render the current frame to a string
    pub fn render_to_string(&mut self) -> String {
        self.app
            .draw()
            .expect("Rendering should succeed in test harness");
        buffer_to_string(self.app.terminal().backend().buffer())
    }

    /// The app under test.
    pub fn app(&self) -> &TuiApp<TestBackend> {
        &self.app
    }
}
