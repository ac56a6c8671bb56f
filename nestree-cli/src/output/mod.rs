//! Output formatting module
//!
//! Formatters collect one tree per input and render them in `finish`. With a
//! single input the bare tree is written; with several, each tree is labelled
//! by its input path.

use anyhow::Result;
use nestree_core::Tree;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Record the tree parsed from `source`
    fn format_tree(&mut self, source: &str, tree: Tree) -> Result<()>;

    /// Write everything recorded so far
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod outline;

pub use json::JsonFormatter;
pub use outline::OutlineFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON (2-space indent)
    #[default]
    Json,
    /// Single-line JSON
    Compact,
    /// Indented outline, one token per line
    Outline,
}

/// Create the formatter for `format`, writing to `writer`
pub fn create_formatter<W>(format: OutputFormat, writer: W) -> Box<dyn OutputFormatter>
where
    W: Write + Send + Sync + 'static,
{
    match format {
        OutputFormat::Json => Box::new(JsonFormatter::new(writer, true)),
        OutputFormat::Compact => Box::new(JsonFormatter::new(writer, false)),
        OutputFormat::Outline => Box::new(OutlineFormatter::new(writer)),
    }
}
