//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Submit command arguments.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Name field
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Email field (not validated)
    #[arg(short, long, default_value = "")]
    pub email: String,

    /// Comment field
    #[arg(short = 'm', long, default_value = "")]
    pub comment: String,

    /// Image file to use as the captured photo
    ///
    /// Without a photo nothing is stored.
    #[arg(short, long, value_name = "FILE")]
    pub photo: Option<PathBuf>,

    /// Also look up the configured location
    #[arg(short, long)]
    pub locate: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Reset command arguments.
#[derive(Debug, Args)]
pub struct ResetCommand {
    /// Confirm deleting every submission
    #[arg(long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,

    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to the standard location)
        file: Option<PathBuf>,
    },
}
