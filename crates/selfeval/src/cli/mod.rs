//! Command-line interface for selfeval.
//!
//! This module provides the CLI structure for the `selfeval` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AnnotateCommand, AnnotationsCommand, ClearCommand, ConfigCommand, ListCommand, ReportCommand,
    SeedCommand, SubmitCommand,
};

/// selfeval - Employee self-evaluation survey and dashboard
///
/// Collects self-evaluations through a step-by-step survey and summarizes
/// them per skill and per sector.
#[derive(Debug, Parser)]
#[command(name = "selfeval")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
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
    /// Run the survey over a file of answers and store the result
    Submit(SubmitCommand),

    /// Show the aggregate report
    Report(ReportCommand),

    /// List stored submissions
    List(ListCommand),

    /// Attach an admin comment to a submission
    Annotate(AnnotateCommand),

    /// Show admin comments
    Annotations(AnnotationsCommand),

    /// Remove every stored submission
    Clear(ClearCommand),

    /// Store deterministic sample submissions
    Seed(SeedCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
