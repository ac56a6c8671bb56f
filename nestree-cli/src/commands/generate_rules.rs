//! Generate rules command implementation

use anyhow::{bail, Context, Result};
use clap::Args;
use nestree_core::rules::loader::RuleFormat;
use nestree_core::RuleSet;
use std::fs;
use std::path::PathBuf;

/// Arguments for the generate-rules command
#[derive(Debug, Args)]
pub struct GenerateRulesArgs {
    /// Output file path (TOML if it ends in .toml, JSON otherwise)
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateRulesArgs {
    /// Execute the generate-rules command
    pub fn execute(&self) -> Result<()> {
        if self.output.exists() && !self.force {
            bail!(
                "{} already exists (use --force to overwrite)",
                self.output.display()
            );
        }

        let format = RuleFormat::from_path(&self.output);
        let content = template_rules().render(format)?;
        fs::write(&self.output, content)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Rule template written to {}", self.output.display());
        println!();
        println!("Next steps:");
        println!("1. Edit the bounds, extra and strip tokens");
        println!("2. Validate your rules:");
        println!("   nestree validate --rules {}", self.output.display());
        println!("3. Use them for parsing:");
        println!(
            "   nestree parse input.txt --rules {}",
            self.output.display()
        );

        Ok(())
    }
}

/// Arithmetic expression rules used as the starting template
pub fn template_rules() -> RuleSet {
    RuleSet::builder()
        .bound("(", ")")
        .extra("-")
        .extra("+")
        .extra("*")
        .extra("/")
        .extra("%")
        .strip("\n")
        .strip(" ")
        .build()
}
