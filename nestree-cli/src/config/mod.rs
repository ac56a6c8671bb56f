//! Configuration module
//!
//! An optional TOML file passed with `--config`. Command-line flags override
//! whatever it sets.

use crate::error::CliError;
use crate::output::OutputFormat;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Processing configuration
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Processing-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Rule file used when `--rules` is absent
    pub rules: Option<PathBuf>,

    /// Fail on unbalanced input
    pub strict: bool,

    /// Reject rule files that have warnings
    pub strict_rules: bool,

    /// Write the normalized rules back to the rule file
    pub persist_rules: bool,

    /// Number of worker threads (0 = auto)
    pub threads: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            rules: None,
            strict: false,
            strict_rules: false,
            persist_rules: true,
            threads: 0,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Pretty print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
        }
    }
}

impl OutputConfig {
    /// The format after applying `pretty = false` to JSON output
    pub fn effective_format(&self) -> OutputFormat {
        match self.format {
            OutputFormat::Json if !self.pretty => OutputFormat::Compact,
            format => format,
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))?;
        let config = toml::from_str(&content)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
