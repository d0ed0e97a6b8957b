//! CLI argument definitions for boardkeep.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "boardkeep",
    version,
    about = "Inspect and manage routing-session recovery checkpoints",
    long_about = "Inspect and manage the crash-recovery checkpoints written while a \
                  board is being routed.\n\n\
                  Checkpoints are named after the CRC-32 of the design file, so the \
                  same design always maps to the same checkpoint."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the identity of a design file and where its checkpoint lives.
    Identity(DesignArgs),

    /// Decode a checkpoint and list its sections.
    Inspect(InspectArgs),

    /// Report whether recovery would be offered for a design.
    Status(DesignArgs),

    /// List checkpoints in the scratch directory.
    List,

    /// Delete the checkpoint of a design.
    Discard(DesignArgs),
}

#[derive(Parser)]
pub struct DesignArgs {
    /// Path to the design file.
    #[arg(value_name = "DESIGN")]
    pub design: PathBuf,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Path to a checkpoint file.
    #[arg(value_name = "CHECKPOINT")]
    pub checkpoint: PathBuf,

    /// Also list the snapshots stored in the checkpoint.
    #[arg(long = "snapshots")]
    pub snapshots: bool,
}

/// CLI log level choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}
