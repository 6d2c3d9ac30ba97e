//! Reference host for the dispatch adapter.
//!
//! The adapter only answers questions; something has to ask them. This module
//! is that something: a virtualized list that owns the surface pool, tracks
//! scroll position and measured heights, and calls the adapter for view
//! types, new surfaces and binds.
//!
//! # Module Structure
//!
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `recycler`: RecyclerList - viewport layout with per-view-type pooling

pub mod height_index;
pub mod recycler;

pub use height_index::HeightIndex;
pub use recycler::{Attached, Measure, RecyclerList, RecyclerStats};
