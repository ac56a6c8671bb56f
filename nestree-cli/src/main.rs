use clap::Parser;
use nestree_cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().command.execute()
}
