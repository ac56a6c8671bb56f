//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;

pub mod generate_rules;
pub mod parse;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse files into nested token trees
    #[command(visible_alias = "process")]
    Parse(parse::ParseArgs),

    /// Check a rule file for problems
    Validate(validate::ValidateArgs),

    /// Write a template rule file
    GenerateRules(generate_rules::GenerateRulesArgs),
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Parse(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateRules(args) => args.execute(),
        }
    }
}
