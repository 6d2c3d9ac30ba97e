//! Configuration file loading with precedence handling.

use crate::adapter::MismatchPolicy;
use crate::registry::DuplicatePolicy;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "POLYVIEW_CONFIG";

/// Environment variable overriding the mismatch policy (`fail` or `recreate`).
pub const MISMATCH_POLICY_ENV: &str = "POLYVIEW_MISMATCH_POLICY";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An environment variable holds a value that cannot be used.
    #[error("Invalid value {value:?} for {name}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Value found.
        value: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/polyview/config.toml`:
///
/// ```toml
/// duplicate_policy = "reject"
/// mismatch_policy = "fail"
/// surface_width = 72
/// show_stats = true
/// log_file_path = "/tmp/polyview.log"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// What registering a content type twice does.
    #[serde(default)]
    pub duplicate_policy: Option<DuplicatePolicy>,

    /// What binding a surface of the wrong view type does.
    #[serde(default)]
    pub mismatch_policy: Option<MismatchPolicy>,

    /// Fixed surface width in columns.
    #[serde(default)]
    pub surface_width: Option<u16>,

    /// Show the recycling stats line on startup.
    #[serde(default)]
    pub show_stats: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Registry duplicate policy.
    pub duplicate_policy: DuplicatePolicy,
    /// Adapter mismatch policy. The viewer degrades by default.
    pub mismatch_policy: MismatchPolicy,
    /// Surface width in columns; `None` uses the terminal width at startup.
    pub surface_width: Option<u16>,
    /// Show stats on startup.
    pub show_stats: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::default(),
            mismatch_policy: MismatchPolicy::Recreate,
            surface_width: None,
            show_stats: false,
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/polyview/polyview.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("polyview").join("polyview.log")
    } else {
        PathBuf::from("polyview.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/polyview/config.toml` on Unix, appropriate path on other
/// platforms, or `None` if no config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("polyview").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `POLYVIEW_CONFIG` environment variable
/// 3. Default path `~/.config/polyview/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        duplicate_policy: config.duplicate_policy.unwrap_or(defaults.duplicate_policy),
        mismatch_policy: config.mismatch_policy.unwrap_or(defaults.mismatch_policy),
        surface_width: config.surface_width.or(defaults.surface_width),
        show_stats: config.show_stats.unwrap_or(defaults.show_stats),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `POLYVIEW_MISMATCH_POLICY` (`fail` or `recreate`, case-insensitive).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnv`] for any other value.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(value) = std::env::var(MISMATCH_POLICY_ENV) {
        config.mismatch_policy = match value.trim().to_ascii_lowercase().as_str() {
            "fail" => MismatchPolicy::Fail,
            "recreate" => MismatchPolicy::Recreate,
            _ => {
                return Err(ConfigError::InvalidEnv {
                    name: MISMATCH_POLICY_ENV,
                    value,
                })
            }
        };
    }

    Ok(config)
}

/// Command-line flags that override configuration.
///
/// Only flags the user actually passed are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--stats`
    pub show_stats: bool,
    /// `--strict`: fail on surface/type mismatches.
    pub strict: bool,
    /// `--width N`
    pub surface_width: Option<u16>,
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if cli.show_stats {
        config.show_stats = true;
    }

    if cli.strict {
        config.mismatch_policy = MismatchPolicy::Fail;
    }

    if let Some(width) = cli.surface_width {
        config.surface_width = Some(width);
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
