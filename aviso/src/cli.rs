// aviso/src/cli.rs
//! Command-line interface for the aviso monitor.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "aviso",
    version = env!("CARGO_PKG_VERSION"),
    about = "Watches a course webpage and the SIU Guaraní portal for updates",
    long_about = "Aviso is a long-lived polling agent. Every few minutes it fetches the \
course page and the authenticated portal, compares a fingerprint of each against the \
previous run, and raises a desktop notification when something changed. Portal \
credentials are read from SIU_GUARANI_USER and SIU_GUARANI_PASSWORD (a .env file is \
honoured).",
)]
pub struct Cli {
    /// Suppress all informational and debug messages.
    #[arg(long, short = 'q', help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, short = 'd', help = "Enable debug logging.")]
    pub debug: bool,

    /// Path to a YAML file overriding the built-in configuration.
    #[arg(long = "config", value_name = "FILE", help = "Path to a YAML configuration file.")]
    pub config: Option<PathBuf>,

    /// Override the path of the timestamp state file.
    #[arg(long = "state-file", value_name = "FILE", help = "Override the path of the timestamp state file.")]
    pub state_file: Option<PathBuf>,

    /// Write the latest fetched course-page HTML to this file for inspection.
    #[arg(long = "dump-html", value_name = "FILE", help = "Write the latest fetched course-page HTML to this file.")]
    pub dump_html: Option<PathBuf>,

    /// The subcommand to run; defaults to `run`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// All available commands for the `aviso` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Runs the polling loop until interrupted with Ctrl-C.
    #[command(about = "Runs the polling loop until interrupted with Ctrl-C.")]
    Run,

    /// Sends a test desktop notification and exits.
    #[command(name = "test-notify", about = "Sends a test desktop notification and exits.")]
    TestNotify,
}
