//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Mailer - sequential bulk-mail dispatcher with pause / resume / cancel
#[derive(Parser, Debug)]
#[command(
    name = "mailer",
    author,
    version,
    about = "Sequential bulk-mail dispatcher",
    long_about = "Sends one message to a list of recipients, one at a time.\n\n\
                  Loads a campaign file, validates every recipient up front, then \n\
                  delivers sequentially with a fixed delay. The batch can be paused, \n\
                  resumed or cancelled from the terminal while it runs."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "MAILER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "MAILER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send the campaign to every recipient
    Send(SendArgs),

    /// Validate campaign and recipients without sending
    Validate(ValidateArgs),

    /// Display campaign information
    Info(InfoArgs),

    /// Write a sample campaign file
    Init(InitArgs),
}

/// Arguments for the `send` command
#[derive(Parser, Debug, Clone)]
pub struct SendArgs {
    /// Path to campaign file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "campaign.toml",
        env = "MAILER_CONFIG"
    )]
    pub config: PathBuf,

    /// Recipient file (one address per line); replaces the campaign's recipients
    #[arg(short, long, env = "MAILER_RECIPIENTS")]
    pub recipients: Option<PathBuf>,

    /// Override the delay between two sends (milliseconds)
    #[arg(long, env = "MAILER_DELAY_MS")]
    pub delay_ms: Option<u64>,

    /// Compose messages without delivering them
    #[arg(long)]
    pub dry_run: bool,

    /// Append status entries to this file as JSON lines
    #[arg(long, env = "MAILER_STATUS_FILE")]
    pub status_file: Option<PathBuf>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "MAILER_METRICS_PORT")]
    pub metrics_port: u16,

    /// Do not read operator commands from stdin
    #[arg(long)]
    pub no_input: bool,

    /// Skip the confirmation prompt on cancel
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to campaign file to validate
    #[arg(short, long, default_value = "campaign.toml")]
    pub config: PathBuf,

    /// Recipient file to validate instead of the campaign's recipients
    #[arg(short, long)]
    pub recipients: Option<PathBuf>,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to campaign file
    #[arg(short, long, default_value = "campaign.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// List every recipient
    #[arg(long)]
    pub recipients: bool,
}

/// Arguments for the `init` command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Where to write the sample campaign (.toml or .json)
    #[arg(short, long, default_value = "campaign.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

impl Cli {
    /// Logging setup selected by the global flags
    pub fn logging_config(&self) -> observability::LoggingConfig {
        observability::LoggingConfig::from_verbosity(self.verbose, self.quiet)
            .with_format(self.log_format.clone().into())
    }
}
