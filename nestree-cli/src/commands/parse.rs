//! Parse command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{create_formatter, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use nestree_core::{normalize_and_persist, RuleSet, Tree, TreeParser};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

const RULES_HELP: &str = r#"Parsing rules:
  bounds  Map of open token to close token. An open token starts a new group;
          its close token ends the innermost group it opened.
  extra   Tokens that split the text but never open or close a group.
  strip   Tokens removed from the output. They still split the text.

Missing keys default to bounds = {}, extra = ["\n"], strip = [].
Unless --no-persist is given, the rule file is rewritten with those defaults
filled in.

Example rules:

{
  "bounds": { "(": ")" },
  "extra": [ "-", "+", "*", "/", "%" ],
  "strip": [ "\n", " " ]
}"#;

/// Arguments for the parse command
#[derive(Debug, Args)]
#[command(after_long_help = RULES_HELP)]
pub struct ParseArgs {
    /// Files to be parsed (paths or glob patterns)
    #[arg(value_name = "INPUT", required = true)]
    pub input: Vec<String>,

    /// Rule file (JSON, or TOML with a .toml extension)
    #[arg(short, long, value_name = "FILE", env = "NESTREE_RULES")]
    pub rules: Option<PathBuf>,

    /// Where to write the tree (`-` for stdout)
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    pub output: PathBuf,

    /// Output format [default: json]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Fail on unclosed groups and stray close tokens
    #[arg(long)]
    pub strict: bool,

    /// Reject rule files that produce validation warnings
    #[arg(long)]
    pub strict_rules: bool,

    /// Do not write the normalized rules back to the rule file
    #[arg(long)]
    pub no_persist: bool,

    /// Number of worker threads (0 = auto)
    #[arg(short = 't', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Settings after merging the configuration file with command-line flags
#[derive(Debug, Clone, PartialEq)]
pub struct ParseSettings {
    /// Rule file, if any
    pub rules: Option<PathBuf>,
    /// Output format
    pub format: OutputFormat,
    /// Strict grouping
    pub strict: bool,
    /// Strict rule validation
    pub strict_rules: bool,
    /// Rewrite the rule file with defaults applied
    pub persist_rules: bool,
    /// Worker threads (0 = auto)
    pub threads: usize,
}

impl ParseArgs {
    /// Execute the parse command
    pub fn execute(&self) -> Result<()> {
        self.init_logging()?;

        log::info!("Starting parse");
        log::debug!("Arguments: {:?}", self);

        let config = match &self.config {
            Some(path) => CliConfig::from_file(path)?,
            None => CliConfig::default(),
        };
        let settings = self.settings(&config);
        log::debug!("Settings: {:?}", settings);

        let files = resolve_patterns(&self.input)?;
        let rules = load_rules(settings.rules.as_deref(), settings.persist_rules)?;

        let parser = TreeParser::builder()
            .rules(rules)
            .strict(settings.strict)
            .strict_rules(settings.strict_rules)
            .build()
            .map_err(|e| CliError::InvalidRules(e.to_string()))?;

        let trees = parse_files(&parser, &files, settings.threads, self.quiet)?;

        let mut formatter = if self.output.as_os_str() == "-" {
            create_formatter(settings.format, io::stdout())
        } else {
            let file = File::create(&self.output)
                .with_context(|| format!("Failed to create {}", self.output.display()))?;
            create_formatter(settings.format, BufWriter::new(file))
        };

        for (path, tree) in trees {
            formatter.format_tree(&path.display().to_string(), tree)?;
        }
        formatter.finish()?;

        log::info!("Parsed {} file(s)", files.len());
        Ok(())
    }

    /// Merge the configuration file with the flags; flags win
    pub fn settings(&self, config: &CliConfig) -> ParseSettings {
        ParseSettings {
            rules: self
                .rules
                .clone()
                .or_else(|| config.processing.rules.clone()),
            format: self
                .format
                .unwrap_or_else(|| config.output.effective_format()),
            strict: self.strict || config.processing.strict,
            strict_rules: self.strict_rules || config.processing.strict_rules,
            persist_rules: !self.no_persist && config.processing.persist_rules,
            threads: self.threads.unwrap_or(config.processing.threads),
        }
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            if let Err(e) = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init()
            {
                log::debug!("Keeping the existing logger: {e}");
            }
        }

        Ok(())
    }
}

/// Load the rule file, or the default rules when none is given
pub fn load_rules(path: Option<&Path>, persist: bool) -> Result<RuleSet> {
    let rules = match path {
        None => {
            log::info!("No rule file given, using default rules");
            RuleSet::default()
        }
        Some(path) if persist => {
            log::debug!("Normalizing rule file {}", path.display());
            normalize_and_persist(path)?
        }
        Some(path) => RuleSet::from_file(path)?,
    };
    Ok(rules)
}

/// Parse every file on a rayon pool, keeping input order
pub fn parse_files(
    parser: &TreeParser,
    files: &[PathBuf],
    threads: usize,
    quiet: bool,
) -> Result<Vec<(PathBuf, Tree)>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("Failed to build thread pool")?;

    let mut reporter = ProgressReporter::new(quiet);
    reporter.init_files(files.len() as u64);

    let trees = pool.install(|| {
        files
            .par_iter()
            .map(|path| -> Result<(PathBuf, Tree)> {
                let text = FileReader::read_text(path)?;
                let tree = parser
                    .parse(&text)
                    .with_context(|| format!("Failed to parse {}", path.display()))?;
                reporter.file_completed(&path.display().to_string());
                Ok((path.clone(), tree))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    reporter.finish();
    Ok(trees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ParseArgs,
    }

    fn args(argv: &[&str]) -> ParseArgs {
        let mut full = vec!["nestree"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    #[test]
    fn test_flags_override_config() {
        let config: CliConfig = toml::from_str(
            r#"
[processing]
rules = "from-config.json"
threads = 2

[output]
format = "outline"
"#,
        )
        .unwrap();

        let parsed = args(&[
            "a.txt",
            "--rules",
            "cli.json",
            "--format",
            "compact",
            "--threads",
            "8",
            "--no-persist",
        ]);
        let settings = parsed.settings(&config);

        assert_eq!(settings.rules, Some(PathBuf::from("cli.json")));
        assert_eq!(settings.format, OutputFormat::Compact);
        assert_eq!(settings.threads, 8);
        assert!(!settings.persist_rules);
    }

    #[test]
    fn test_config_fills_missing_flags() {
        let config: CliConfig = toml::from_str(
            "[processing]\nrules = \"r.json\"\nstrict = true\n\n[output]\npretty = false\n",
        )
        .unwrap();

        let settings = args(&["a.txt"]).settings(&config);

        assert_eq!(settings.rules, Some(PathBuf::from("r.json")));
        assert!(settings.strict);
        assert!(settings.persist_rules);
        assert_eq!(settings.format, OutputFormat::Compact);
        assert_eq!(settings.threads, 0);
    }

    #[test]
    fn test_default_output_is_stdout() {
        let parsed = args(&["a.txt", "b.txt"]);
        assert_eq!(parsed.output, PathBuf::from("-"));
        assert_eq!(parsed.input, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_init_logging_twice_is_ok() {
        let parsed = args(&["a.txt", "-v"]);
        assert!(parsed.init_logging().is_ok());
        assert!(parsed.init_logging().is_ok());
    }

    #[test]
    fn test_load_rules_defaults_without_file() {
        let rules = load_rules(None, true).unwrap();
        assert_eq!(rules, RuleSet::default());
    }

    #[test]
    fn test_load_rules_no_persist_leaves_file_alone() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rules.json");
        fs::write(&path, r#"{"bounds": {"(": ")"}}"#).unwrap();

        let rules = load_rules(Some(&path), false).unwrap();
        assert_eq!(rules.extra, vec!["\n"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"bounds": {"(": ")"}}"#);
    }

    #[test]
    fn test_load_rules_persist_rewrites_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rules.json");
        fs::write(&path, r#"{"bounds": {"(": ")"}}"#).unwrap();

        load_rules(Some(&path), true).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"strip\": []"));
    }

    #[test]
    fn test_parse_files_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut files = Vec::new();
        for (name, text) in [("a.txt", "(a)"), ("b.txt", "b"), ("c.txt", "((c))")] {
            let path = temp_dir.path().join(name);
            fs::write(&path, text).unwrap();
            files.push(path);
        }

        let rules = RuleSet::builder().bound("(", ")").build();
        let parser = TreeParser::new(rules).unwrap();
        let trees = parse_files(&parser, &files, 2, true).unwrap();

        let names: Vec<_> = trees.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(names, files);
        assert_eq!(trees[1].1, vec![nestree_core::Node::token("b")]);
    }

    #[test]
    fn test_parse_files_strict_failure_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("open.txt");
        fs::write(&path, "(a").unwrap();

        let parser = TreeParser::builder()
            .rules(RuleSet::builder().bound("(", ")").build())
            .strict(true)
            .build()
            .unwrap();
        let err = parse_files(&parser, &[path], 1, true).unwrap_err();

        assert!(err.to_string().contains("open.txt"));
    }
}
