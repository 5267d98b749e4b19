//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Framegrab - header-synchronized frame capture from serial byte streams
#[derive(Parser, Debug)]
#[command(
    name = "framegrab",
    author,
    version,
    about = "Header-synchronized frame capture for serial byte streams",
    long_about = "Captures a raw byte stream from a serial port (or a recorded blob), \n\
                  synchronizes on a configurable header pattern, accumulates until the \n\
                  line goes idle, and extracts fixed-length candidate frames."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "FRAMEGRAB_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "FRAMEGRAB_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one capture attempt
    Capture(CaptureArgs),

    /// Validate configuration file without capturing
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `capture` command
#[derive(Parser, Debug, Clone)]
pub struct CaptureArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "config.toml", env = "FRAMEGRAB_CONFIG")]
    pub config: PathBuf,

    /// Override serial device path from configuration
    #[arg(long, env = "FRAMEGRAB_PORT")]
    pub port: Option<String>,

    /// Override baud rate from configuration
    #[arg(long, env = "FRAMEGRAB_BAUD")]
    pub baud: Option<u32>,

    /// Replay a recorded byte blob instead of opening a serial port
    #[arg(long, env = "FRAMEGRAB_REPLAY")]
    pub replay: Option<PathBuf>,

    /// Replay chunk size in bytes
    #[arg(long, default_value = "64", env = "FRAMEGRAB_REPLAY_CHUNK")]
    pub replay_chunk: usize,

    /// Replay chunk cadence in milliseconds
    #[arg(long, default_value = "10", env = "FRAMEGRAB_REPLAY_INTERVAL")]
    pub replay_interval_ms: u64,

    /// Validate configuration and exit without capturing
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "FRAMEGRAB_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show detailed timing configuration
    #[arg(long)]
    pub timing: bool,

    /// Show output artifact configuration
    #[arg(long)]
    pub output: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
