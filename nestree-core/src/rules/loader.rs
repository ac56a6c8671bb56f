//! Rule file loading and persistence
//!
//! Rule files are JSON unless the extension is `.toml`.

use super::RuleSet;
use crate::error::{CoreError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Serialization format of a rule file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    /// JSON object with `bounds`, `extra` and `strip`
    Json,
    /// TOML document with the same keys
    Toml,
}

impl RuleFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => RuleFormat::Toml,
            _ => RuleFormat::Json,
        }
    }
}

impl RuleSet {
    /// Parse rules from a string in the given format
    pub fn parse_str(content: &str, format: RuleFormat, origin: &Path) -> Result<Self> {
        match format {
            RuleFormat::Json => {
                serde_json::from_str(content).map_err(|source| CoreError::InvalidJson {
                    path: origin.to_path_buf(),
                    source,
                })
            }
            RuleFormat::Toml => toml::from_str(content).map_err(|source| CoreError::InvalidToml {
                path: origin.to_path_buf(),
                source,
            }),
        }
    }

    /// Load rules from a file, filling defaults for missing collections
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => CoreError::RulesNotFound(path.to_path_buf()),
            _ => CoreError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let rules = Self::parse_str(&content, RuleFormat::from_path(path), path)?;
        log::debug!(
            "Loaded rules from {}: {} bound(s), {} extra, {} strip",
            path.display(),
            rules.bounds.len(),
            rules.extra.len(),
            rules.strip.len()
        );
        Ok(rules)
    }

    /// Render rules in the given format. JSON uses a 2-space indent and
    /// sorted keys.
    pub fn render(&self, format: RuleFormat) -> Result<String> {
        match format {
            RuleFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            RuleFormat::Toml => Ok(toml::to_string_pretty(self)?),
        }
    }

    /// Write rules to a file, format chosen by extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = self.render(RuleFormat::from_path(path))?;
        fs::write(path, content).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load a rule file, apply defaults, and write the normalized rules back to
/// the same file
pub fn normalize_and_persist<P: AsRef<Path>>(path: P) -> Result<RuleSet> {
    let path = path.as_ref();
    let rules = RuleSet::from_file(path)?;
    rules.to_file(path)?;
    log::info!("Normalized rules written back to {}", path.display());
    Ok(rules)
}
