//! polyview
//!
//! Type-dispatch and view-recycling registry for heterogeneous virtualized
//! lists. Register one render handler per content type, wrap content in
//! [`ListItem`]s, and let a list host ask the [`DispatchAdapter`] which
//! surface each position needs, how to create it, and how to bind it.
//!
//! ```
//! use polyview::{DispatchAdapter, ItemsBuilder, RenderHandler, TypeRegistry};
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Note(&'static str);
//!
//! struct NoteHandler;
//!
//! impl RenderHandler<String> for NoteHandler {
//!     type Content = Note;
//!
//!     fn create_surface(&self) -> String {
//!         String::new()
//!     }
//!
//!     fn bind(&self, surface: &mut String, content: &Note) {
//!         surface.clear();
//!         surface.push_str(content.0);
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(NoteHandler)?;
//! let items = ItemsBuilder::new(&registry).push(Note("hello"))?.build();
//!
//! let adapter = DispatchAdapter::with_items(Arc::new(registry), items);
//! let mut surface = adapter.create_surface(adapter.type_id_at(0)?)?;
//! adapter.bind_surface(&mut surface, 0)?;
//! assert_eq!(surface.get(), "hello");
//! # Ok::<(), polyview::DispatchError>(())
//! ```
//!
//! The `host` module holds a reference list host; `feed`, `source` and
//! `view` make up the terminal demo shipped as the `polyview` binary.

pub mod adapter;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod handler;
pub mod host;
pub mod item;
pub mod logging;
pub mod registry;
pub mod source;
pub mod view;

pub use adapter::{BindOutcome, DispatchAdapter, ItemsSender, MismatchPolicy, TaggedSurface};
pub use content::{Content, ContentType};
pub use error::{AppError, DispatchError};
pub use handler::RenderHandler;
pub use item::{ItemsBuilder, ListItem};
pub use registry::{DuplicatePolicy, RegistryStats, TypeRegistry, ViewType};

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
