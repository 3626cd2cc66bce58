//! Command-line interface for formcapture.
//!
//! This module provides the CLI structure for the `formcap` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, ListCommand, ResetCommand, StatusCommand, SubmitCommand};

use crate::logging::Verbosity;

/// formcap - capture form submissions locally
///
/// Stores name, email, comment and a photo locator in a local database and
/// lists what has been stored.
#[derive(Debug, Parser)]
#[command(name = "formcap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in the form and submit it
    Submit(SubmitCommand),

    /// List stored submissions
    List(ListCommand),

    /// Delete every stored submission
    Reset(ResetCommand),

    /// Show database status
    Status(StatusCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
