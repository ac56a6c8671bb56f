//! nestree CLI library
//!
//! This library provides the command-line interface for the nestree
//! bracket-matching tokenizer.

use clap::Parser;

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};

/// Split text on rule tokens and group it into nested trees
#[derive(Debug, Parser)]
#[command(name = "nestree", version, about, long_about = None)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: commands::Commands,
}
