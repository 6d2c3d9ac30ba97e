//! Error types for polyview.
//!
//! Every failure the dispatch core can report is a programmer error, not a
//! recoverable runtime condition: a handler that was never registered, a
//! position past the end of the list, a surface bound to the wrong type.
//! The policy is to fail loudly at the call that detected it, so each
//! variant carries enough context to name the culprit.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Binary-level error wrapping every subsystem failure
//!   - [`DispatchError`] - Registry, item construction and adapter failures
//!   - [`FeedError`](crate::feed::FeedError) - Reading demo feeds
//!   - [`ConfigError`](crate::config::ConfigError) - Loading the config file
//!   - [`LoggingError`](crate::logging::LoggingError) - Installing the subscriber
//!   - [`TuiError`](crate::view::TuiError) - Terminal UI failures
//!   - `std::io::Error` - Terminal setup outside the UI loop

use crate::registry::ViewType;
use thiserror::Error;

/// Failures raised by the registry, list items and the dispatch adapter.
///
/// None of these are retried. The caller that triggered the error is the one
/// holding the bug (bad registration, stale position, foreign surface).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Registration input was rejected.
    ///
    /// Raised at startup, e.g. registering the same content type twice under
    /// [`DuplicatePolicy::Reject`](crate::registry::DuplicatePolicy::Reject).
    #[error("Invalid registration: {reason}")]
    Configuration {
        /// Why the registration was refused.
        reason: String,
    },

    /// A content value's type has no registered handler.
    ///
    /// Raised when building a [`ListItem`](crate::item::ListItem). The item is
    /// never silently skipped: dropping it would shift every later position.
    #[error("Content type `{type_name}` was never registered")]
    UnregisteredType {
        /// Rust type name of the offending content.
        type_name: &'static str,
    },

    /// A view type outside the registered range reached the registry.
    ///
    /// Indicates the adapter and registry disagree (items built against a
    /// different registry). Always logged before it is returned.
    #[error("Unknown view type {view_type} (registry holds {registered} types)")]
    UnknownType {
        /// The view type that was looked up.
        view_type: ViewType,
        /// Number of registered types at lookup time.
        registered: usize,
    },

    /// A position outside the backing sequence was requested.
    #[error("Position {position} out of bounds (item count: {len})")]
    Index {
        /// Requested position.
        position: usize,
        /// Number of items in the sequence.
        len: usize,
    },

    /// A surface created for one view type was asked to bind another.
    #[error(
        "Surface created for view type {surface} cannot bind position {position} (view type {expected})"
    )]
    TypeMismatch {
        /// Position being bound.
        position: usize,
        /// View type the surface was tagged with at creation.
        surface: ViewType,
        /// View type of the item at `position`.
        expected: ViewType,
    },

    /// The handler registered for a view type received content of another type.
    ///
    /// Only reachable when an item resolved against one registry is dispatched
    /// through another.
    #[error("Handler for view type {view_type} expects `{expected}`, got `{found}`")]
    ContentMismatch {
        /// View type whose handler was invoked.
        view_type: ViewType,
        /// Content type the handler was registered for.
        expected: &'static str,
        /// Content type carried by the item.
        found: &'static str,
    },
}

/// Top-level error for the `polyview` binary.
///
/// Subsystem errors convert via `From`, so `main` can use `?` throughout.
#[derive(Debug, Error)]
pub enum AppError {
    /// Dispatch core failure.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Feed input could not be read.
    #[error("Feed error: {0}")]
    Feed(#[from] crate::feed::FeedError),

    /// Config file could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// The terminal UI failed.
    #[error("TUI error: {0}")]
    Tui(#[from] crate::view::TuiError),

    /// Terminal I/O outside the UI loop.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
