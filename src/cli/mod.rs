//! Command-line interface definitions.

pub mod check;
pub mod output;
pub mod run;
pub mod scan;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Edgewatch - Prediction market edge scanner.
#[derive(Parser, Debug)]
#[command(name = "edgewatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll markets, serve the API and sync the spreadsheet (foreground)
    Run(RunArgs),

    /// Run one poll cycle and print the top edges
    Scan(ScanArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `edgewatch check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file and credentials
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file (defaults apply if it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override the API server port
    #[arg(long)]
    pub port: Option<u16>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for the `scan` subcommand.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Path to configuration file (defaults apply if it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Number of edges to print
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}
