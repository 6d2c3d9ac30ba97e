//! Demo feed: three content types rendered into terminal surfaces.
//!
//! Feeds are JSONL, one record per line, tagged by `kind`:
//!
//! ```text
//! {"kind":"divider","date":"2026-10-17"}
//! {"kind":"text","author":"ada","body":"Shipped the recycler."}
//! {"kind":"image","url":"https://example.org/cat.png","alt":"a cat","width":640,"height":480}
//! ```
//!
//! Parsing happens before any [`ListItem`] exists, so a skipped malformed
//! line never shifts item positions.

pub mod handlers;
pub mod surface;

pub use handlers::{
    register_feed_handlers, DayDividerHandler, FeedStyles, ImagePostHandler, TextPostHandler,
};
pub use surface::CellSurface;

use crate::error::DispatchError;
use crate::item::ListItem;
use crate::registry::TypeRegistry;
use chrono::{Days, NaiveDate};
use serde::Deserialize;
use std::io::BufRead;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

/// A short text post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextPost {
    /// Author handle, shown as `@author`.
    pub author: String,
    /// Post body; wrapped to the surface width.
    pub body: String,
}

/// An image post, rendered as a placeholder card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImagePost {
    /// Image location.
    pub url: String,
    /// Optional description.
    #[serde(default)]
    pub alt: Option<String>,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

/// A divider between days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DayDivider {
    /// Day that starts below the divider.
    pub date: NaiveDate,
}

/// One parsed feed line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FeedRecord {
    /// `{"kind":"text",...}`
    Text(TextPost),
    /// `{"kind":"image",...}`
    Image(ImagePost),
    /// `{"kind":"divider",...}`
    Divider(DayDivider),
}

impl FeedRecord {
    /// Wrap this record's content as a [`ListItem`].
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnregisteredType`] if the record's content
    /// type has no handler in `registry`.
    pub fn into_item<S>(self, registry: &TypeRegistry<S>) -> Result<ListItem, DispatchError> {
        match self {
            FeedRecord::Text(post) => ListItem::new(registry, post),
            FeedRecord::Image(post) => ListItem::new(registry, post),
            FeedRecord::Divider(divider) => ListItem::new(registry, divider),
        }
    }
}

/// A feed line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line_number: usize,
    /// Parser message.
    pub message: String,
}

/// Result of parsing a feed: the good records and the skipped lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    /// Records in feed order.
    pub records: Vec<FeedRecord>,
    /// Lines that failed to parse.
    pub skipped: Vec<SkippedLine>,
}

impl ParsedFeed {
    /// Resolve every record into a [`ListItem`], preserving order.
    ///
    /// # Errors
    ///
    /// Fails on the first record whose content type is not registered.
    pub fn into_items<S>(self, registry: &TypeRegistry<S>) -> Result<Vec<ListItem>, DispatchError> {
        self.records
            .into_iter()
            .map(|record| record.into_item(registry))
            .collect()
    }
}

/// Errors reading a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed file does not exist.
    #[error("Feed file not found: {path:?}")]
    NotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// Reading the feed failed.
    #[error("Failed to read feed: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse a JSONL feed.
///
/// Blank lines are ignored. Malformed lines are logged and collected in
/// [`ParsedFeed::skipped`].
///
/// # Errors
///
/// Returns [`FeedError::Io`] if reading fails.
pub fn parse_feed(reader: impl BufRead) -> Result<ParsedFeed, FeedError> {
    let mut parsed = ParsedFeed::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<FeedRecord>(&line) {
            Ok(record) => parsed.records.push(record),
            Err(e) => {
                warn!(line_number, error = %e, "Skipping malformed feed line");
                parsed.skipped.push(SkippedLine {
                    line_number,
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        records = parsed.records.len(),
        skipped = parsed.skipped.len(),
        "Feed parsed"
    );
    Ok(parsed)
}

/// Built-in feed used when no input is given: `days` days of mixed posts
/// ending on `last_day`.
pub fn sample_feed(last_day: NaiveDate, days: u64) -> Vec<FeedRecord> {
    const AUTHORS: [&str; 4] = ["ada", "grace", "linus", "barbara"];
    const BODIES: [&str; 5] = [
        "Registered a new content type without touching the list code.",
        "Scrolling through a few thousand rows; only a handful of surfaces exist.",
        "Type ids come from registration order, so keep that order fixed at startup.",
        "Binding twice gives the same screen as binding once.",
        "Short one.",
    ];

    let mut records = Vec::new();
    for day in 0..days {
        let date = last_day
            .checked_sub_days(Days::new(days - 1 - day))
            .unwrap_or(last_day);
        records.push(FeedRecord::Divider(DayDivider { date }));

        for slot in 0..6u64 {
            let n = (day * 6 + slot) as usize;
            if slot % 3 == 2 {
                records.push(FeedRecord::Image(ImagePost {
                    url: format!("https://example.org/photos/{n}.png"),
                    alt: (n % 2 == 0).then(|| format!("photo #{n}")),
                    width: 640,
                    height: 480,
                }));
            } else {
                records.push(FeedRecord::Text(TextPost {
                    author: AUTHORS[n % AUTHORS.len()].to_string(),
                    body: BODIES[n % BODIES.len()].to_string(),
                }));
            }
        }
    }
    records
}
