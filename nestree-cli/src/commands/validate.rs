//! Validate command implementation

use crate::error::CliError;
use anyhow::Result;
use clap::Args;
use nestree_core::{RuleIssue, RuleSet, Severity};
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Rule file to validate
    #[arg(short, long, value_name = "FILE", required = true)]
    pub rules: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating rules: {}", self.rules.display());

        let rules = RuleSet::from_file(&self.rules)?;
        let issues = rules.validate();
        for issue in &issues {
            println!("  {issue}");
        }

        match failure_summary(&issues, self.strict) {
            Some(summary) => {
                println!("✗ Rules are invalid");
                Err(CliError::InvalidRules(summary).into())
            }
            None => {
                println!("✓ Rules are valid");
                println!("  Bounds: {}", rules.bounds.len());
                println!("  Extra:  {}", rules.extra.len());
                println!("  Strip:  {}", rules.strip.len());
                Ok(())
            }
        }
    }
}

/// Summarize the issues that fail validation, if any
fn failure_summary(issues: &[RuleIssue], strict: bool) -> Option<String> {
    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warnings = issues.len() - errors;

    if errors > 0 || (strict && warnings > 0) {
        Some(format!("{errors} error(s), {warnings} warning(s)"))
    } else {
        None
    }
}
