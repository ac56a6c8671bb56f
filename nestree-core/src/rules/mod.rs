//! Rule set model
//!
//! A rule set has three collections:
//! - `bounds`: open token -> close token. Open tokens push a frame, the
//!   matching close token pops it.
//! - `extra`: tokens that only split text.
//! - `strip`: tokens that split text and are dropped from the output.
//!
//! Rule files may omit any collection; the defaults are `bounds = {}`,
//! `extra = ["\n"]` and `strip = []`.

pub mod loader;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use loader::normalize_and_persist;
pub use validation::{IssueKind, RuleIssue, Severity};

/// Tokenization and grouping rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Open token -> close token
    #[serde(default)]
    pub bounds: BTreeMap<String, String>,

    /// Separator-only tokens
    #[serde(default = "default_extra")]
    pub extra: Vec<String>,

    /// Tokens removed from the output
    #[serde(default)]
    pub strip: Vec<String>,
}

fn default_extra() -> Vec<String> {
    vec!["\n".to_string()]
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            bounds: BTreeMap::new(),
            extra: default_extra(),
            strip: Vec::new(),
        }
    }
}

impl RuleSet {
    /// Create a builder starting from an empty rule set (no default `extra`)
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Tokens that split text without grouping: `extra` followed by `strip`,
    /// first occurrence wins
    pub fn separators(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.extra
            .iter()
            .chain(self.strip.iter())
            .filter(|token| seen.insert(token.as_str()))
            .cloned()
            .collect()
    }

    /// Open tokens in key order
    pub fn open_tokens(&self) -> impl Iterator<Item = &str> {
        self.bounds.keys().map(String::as_str)
    }

    /// Close tokens in key order of their open token
    pub fn close_tokens(&self) -> impl Iterator<Item = &str> {
        self.bounds.values().map(String::as_str)
    }

    /// Whether `token` opens a frame
    pub fn is_open(&self, token: &str) -> bool {
        self.bounds.contains_key(token)
    }

    /// Whether `token` closes some frame
    pub fn is_close(&self, token: &str) -> bool {
        self.bounds.values().any(|close| close == token)
    }

    /// Close token paired with `open`
    pub fn close_for(&self, open: &str) -> Option<&str> {
        self.bounds.get(open).map(String::as_str)
    }
}

/// Builder for [`RuleSet`]
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    bounds: BTreeMap<String, String>,
    extra: Vec<String>,
    strip: Vec<String>,
}

impl RuleSetBuilder {
    /// Add an open/close pair. A later pair with the same open token replaces
    /// the earlier one.
    pub fn bound(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.bounds.insert(open.into(), close.into());
        self
    }

    /// Add a separator-only token
    pub fn extra(mut self, token: impl Into<String>) -> Self {
        self.extra.push(token.into());
        self
    }

    /// Add a token to remove from the output
    pub fn strip(mut self, token: impl Into<String>) -> Self {
        self.strip.push(token.into());
        self
    }

    /// Build the rule set
    pub fn build(self) -> RuleSet {
        RuleSet {
            bounds: self.bounds,
            extra: self.extra,
            strip: self.strip,
        }
    }
}
