//! polyview - Entry Point

use chrono::Local;
use clap::Parser;
use polyview::config::{self, CliOverrides, ResolvedConfig};
use polyview::feed::{register_feed_handlers, FeedStyles};
use polyview::{AppError, DispatchAdapter, TypeRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Width used when neither config nor the terminal provides one.
const FALLBACK_WIDTH: u16 = 80;

/// polyview - scroll a mixed feed through a recycling list
#[derive(Parser, Debug)]
#[command(name = "polyview")]
#[command(version)]
#[command(about = "Scroll a JSONL feed of mixed content types in the terminal")]
pub struct Args {
    /// Path to JSONL feed (reads piped stdin, else a built-in sample)
    pub file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show recycling stats on startup
    #[arg(long)]
    pub stats: bool,

    /// Fail instead of recreating a surface bound to the wrong type
    #[arg(long)]
    pub strict: bool,

    /// Surface width in columns (defaults to the terminal width)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub width: Option<u16>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            show_stats: self.stats,
            strict: self.strict,
            surface_width: self.width,
        }
    }
}

/// Defaults → Config File → Env Vars → CLI Args
fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    let config_file = config::load_config_with_precedence(args.config.clone())?;
    let merged = config::merge_config(config_file);
    let with_env = config::apply_env_overrides(merged)?;
    Ok(config::apply_cli_overrides(with_env, args.overrides()))
}

fn run(args: Args) -> Result<(), AppError> {
    let config = resolve_config(&args)?;

    polyview::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let width = config.surface_width.unwrap_or_else(|| {
        crossterm::terminal::size()
            .map(|(w, _)| w)
            .unwrap_or(FALLBACK_WIDTH)
            .max(1)
    });

    let mut registry = TypeRegistry::with_policy(config.duplicate_policy);
    register_feed_handlers(&mut registry, width, FeedStyles::default())?;

    let source = polyview::source::detect_feed_source(args.file);
    let parsed = source.load(Local::now().date_naive())?;
    let skipped = parsed.skipped.len();
    let items = parsed.into_items(&registry)?;

    let adapter = DispatchAdapter::with_items(Arc::new(registry), items)
        .with_mismatch_policy(config.mismatch_policy);

    polyview::view::run_with_adapter(adapter, config.show_stats, skipped)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run(Args::parse())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyview::MismatchPolicy;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["polyview", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["polyview", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["polyview"]);
        assert_eq!(args.file, None);
        assert_eq!(args.config, None);
        assert!(!args.stats);
        assert!(!args.strict);
        assert_eq!(args.width, None);
    }

    #[test]
    fn test_width_rejects_zero() {
        let err = Args::try_parse_from(["polyview", "--width", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_combined_flags() {
        let args = Args::parse_from([
            "polyview",
            "feed.jsonl",
            "--stats",
            "--strict",
            "--width",
            "60",
            "--config",
            "/custom/config.toml",
        ]);
        assert_eq!(args.file, Some(PathBuf::from("feed.jsonl")));
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(
            args.overrides(),
            CliOverrides {
                show_stats: true,
                strict: true,
                surface_width: Some(60),
            }
        );
    }

    #[test]
    fn test_strict_flows_through_config_precedence_chain() {
        use polyview::config::{apply_cli_overrides, merge_config, ConfigFile};

        let config_file = ConfigFile {
            mismatch_policy: Some(MismatchPolicy::Recreate),
            ..ConfigFile::default()
        };
        let merged = merge_config(Some(config_file));
        assert_eq!(merged.mismatch_policy, MismatchPolicy::Recreate);

        let args = Args::parse_from(["polyview", "--strict"]);
        let with_cli = apply_cli_overrides(merged, args.overrides());
        assert_eq!(with_cli.mismatch_policy, MismatchPolicy::Fail);
    }
}
