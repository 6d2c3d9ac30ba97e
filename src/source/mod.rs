//! Feed input sources.
//!
//! A feed comes from a file given on the command line, from piped stdin, or,
//! when neither is available, from the built-in sample.

use crate::feed::{parse_feed, sample_feed, FeedError, ParsedFeed};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufReader, IsTerminal};
use std::path::PathBuf;
use tracing::info;

/// Where the feed is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// JSONL file on disk.
    File(PathBuf),
    /// JSONL piped on stdin.
    Stdin,
    /// Built-in sample feed.
    Sample,
}

impl FeedSource {
    /// Read and parse the feed.
    ///
    /// `today` anchors the sample feed's dates.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::NotFound`] if a file source does not exist, or
    /// [`FeedError::Io`] if reading fails.
    pub fn load(&self, today: NaiveDate) -> Result<ParsedFeed, FeedError> {
        let parsed = match self {
            FeedSource::File(path) => {
                if !path.exists() {
                    return Err(FeedError::NotFound { path: path.clone() });
                }
                let file = File::open(path)?;
                parse_feed(BufReader::new(file))?
            }
            FeedSource::Stdin => parse_feed(std::io::stdin().lock())?,
            FeedSource::Sample => ParsedFeed {
                records: sample_feed(today, SAMPLE_DAYS),
                skipped: Vec::new(),
            },
        };
        info!(source = ?self, records = parsed.records.len(), "Feed loaded");
        Ok(parsed)
    }
}

/// Days covered by the built-in sample.
const SAMPLE_DAYS: u64 = 30;

/// Pick the feed source.
///
/// # Logic:
/// 1. File path given: `File`
/// 2. Stdin is piped: `Stdin`
/// 3. Else: `Sample`
pub fn detect_feed_source(file: Option<PathBuf>) -> FeedSource {
    choose_source(file, std::io::stdin().is_terminal())
}

fn choose_source(file: Option<PathBuf>, stdin_is_terminal: bool) -> FeedSource {
    match file {
        Some(path) => FeedSource::File(path),
        None if !stdin_is_terminal => FeedSource::Stdin,
        None => FeedSource::Sample,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn file_argument_wins_over_stdin() {
        let path = PathBuf::from("feed.jsonl");
        assert_eq!(
            choose_source(Some(path.clone()), false),
            FeedSource::File(path)
        );
    }

    #[test]
    fn piped_stdin_is_used_without_file() {
        assert_eq!(choose_source(None, false), FeedSource::Stdin);
    }

    #[test]
    fn terminal_stdin_falls_back_to_sample() {
        assert_eq!(choose_source(None, true), FeedSource::Sample);
    }

    #[test]
    fn load_reads_file() {
        let dir = std::env::temp_dir().join("polyview_source_load_reads_file");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("feed.jsonl");
        fs::write(
            &path,
            "{\"kind\":\"text\",\"author\":\"a\",\"body\":\"b\"}\nnope\n",
        )
        .unwrap();

        let parsed = FeedSource::File(path).load(today()).unwrap();
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].line_number, 2);
    }

    #[test]
    fn load_reports_missing_file() {
        let missing = std::env::temp_dir().join("polyview_missing_feed_12345.jsonl");
        let err = FeedSource::File(missing.clone()).load(today()).unwrap_err();
        match err {
            FeedError::NotFound { path } => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn sample_source_is_never_empty() {
        let parsed = FeedSource::Sample.load(today()).unwrap();
        assert_eq!(parsed.records.len(), 30 * 7);
        assert!(parsed.skipped.is_empty());
    }
}
