//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Submit command arguments.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// JSON file mapping field keys to answers
    #[arg(short, long, value_name = "FILE")]
    pub file: PathBuf,

    /// Skip the welcome screen
    #[arg(long)]
    pub direct: bool,
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Length of the strengths and attention lists
    #[arg(short, long, value_name = "N")]
    pub top: Option<usize>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Annotate command arguments.
#[derive(Debug, Args)]
pub struct AnnotateCommand {
    /// Submission id the comment refers to
    pub key: String,

    /// The comment
    pub comment: String,

    /// Who is writing the comment
    #[arg(short, long, default_value = "admin")]
    pub author: String,
}

/// Annotations command arguments.
#[derive(Debug, Args)]
pub struct AnnotationsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Confirm removal of every submission
    #[arg(short, long)]
    pub yes: bool,
}

/// Seed command arguments.
#[derive(Debug, Args)]
pub struct SeedCommand {
    /// Number of sample submissions to store
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,
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

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
