//! Subscriber setup for the `boardkeep` binary.
//!
//! The library crates only emit events. Checkpoint writes, loads and
//! deletions are logged at `info`; swallowed failures (autosave I/O, skipped
//! snapshot categories, unknown sections) at `warn`; throttle decisions and
//! identity computation at `debug`.

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Mutex;

use clap::ColorChoice;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, LogFormatArg};

/// Crates whose events follow the configured level. Everything else stays
/// at warn.
const OWN_CRATES: [&str; 3] = [
    "boardkeep_cli",
    "boardkeep_persistence",
    "boardkeep_session",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Maximum level for our crates.
    pub level_filter: LevelFilter,
    /// Whether `RUST_LOG` may override `level_filter`.
    pub use_env_filter: bool,
    pub with_ansi: bool,
    pub format: LogFormatArg,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
}

impl LogConfig {
    /// Resolve the global flags. `--log-level` beats `-v`/`-q`, and either
    /// one disables the `RUST_LOG` override.
    pub fn from_cli(cli: &Cli) -> Self {
        let level_filter = match cli.log_level {
            Some(level) => level.into(),
            None => cli.verbosity.tracing_level_filter(),
        };
        let with_ansi = match cli.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
        };
        Self {
            level_filter,
            use_env_filter: !(cli.verbosity.is_present() || cli.log_level.is_some()),
            with_ansi,
            format: cli.log_format,
            log_file: cli.log_file.clone(),
        }
    }

    /// Filter directives for this configuration, ignoring `RUST_LOG`.
    pub fn directives(&self) -> String {
        let level = self.level_filter.to_string().to_lowercase();
        let mut directives = vec!["warn".to_string()];
        directives.extend(OWN_CRATES.iter().map(|krate| format!("{krate}={level}")));
        directives.join(",")
    }

    fn env_filter(&self) -> EnvFilter {
        if self.use_env_filter
            && let Ok(filter) = EnvFilter::try_from_default_env()
        {
            return filter;
        }
        EnvFilter::new(self.directives())
    }
}

/// Install the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let writer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };

    let base = fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .without_time();
    let layer = match config.format {
        LogFormatArg::Json => base.json().boxed(),
        LogFormatArg::Compact => base.compact().with_ansi(config.with_ansi).boxed(),
        LogFormatArg::Pretty => base.with_ansi(config.with_ansi).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(config.env_filter())
        .init();
    Ok(())
}
