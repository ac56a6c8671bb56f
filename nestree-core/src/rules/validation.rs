//! Rule set validation
//!
//! Grouping is total over any rule set, so most findings are warnings about
//! configurations whose behaviour is surprising rather than broken.

use super::RuleSet;
use crate::error::{CoreError, Result};
use std::collections::HashSet;
use std::fmt;

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The rule set works but the behaviour is probably unintended
    Warning,
    /// The rule set cannot be honoured as written
    Error,
}

/// Kind of rule finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// Empty token, which would match between every character
    EmptyToken,
    /// Open token equal to its own close token
    SelfClosing,
    /// Token that opens one pair and closes another
    OpenAndClose,
    /// Open or close token also listed as a separator
    OpenIsSeparator,
    /// Token listed twice in the same collection
    Duplicate,
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleIssue {
    /// Severity of the finding
    pub severity: Severity,
    /// What kind of problem it is
    pub kind: IssueKind,
    /// The token involved
    pub token: String,
    /// Human readable description
    pub message: String,
}

impl fmt::Display for RuleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level}: {:?}: {}", self.token, self.message)
    }
}

impl RuleIssue {
    fn new(severity: Severity, kind: IssueKind, token: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            token: token.to_string(),
            message: message.into(),
        }
    }
}

impl RuleSet {
    /// Collect all findings for this rule set
    pub fn validate(&self) -> Vec<RuleIssue> {
        let mut issues = Vec::new();

        let all_tokens = self
            .bounds
            .iter()
            .flat_map(|(open, close)| [open, close])
            .chain(self.extra.iter())
            .chain(self.strip.iter());
        if all_tokens.into_iter().any(|token| token.is_empty()) {
            issues.push(RuleIssue::new(
                Severity::Error,
                IssueKind::EmptyToken,
                "",
                "empty tokens cannot delimit text",
            ));
        }

        for (open, close) in &self.bounds {
            if open.is_empty() {
                continue;
            }
            if open == close {
                issues.push(RuleIssue::new(
                    Severity::Warning,
                    IssueKind::SelfClosing,
                    open,
                    "open token is its own close token; every occurrence opens and closes an empty frame",
                ));
            } else if self.is_close(open) {
                issues.push(RuleIssue::new(
                    Severity::Warning,
                    IssueKind::OpenAndClose,
                    open,
                    "token opens one pair and closes another; the open role is applied first",
                ));
            }
        }

        let mut reported = HashSet::new();
        for token in self.open_tokens().chain(self.close_tokens()) {
            if token.is_empty() || !reported.insert(token) {
                continue;
            }
            if self.extra.iter().any(|extra| extra == token) {
                issues.push(RuleIssue::new(
                    Severity::Warning,
                    IssueKind::OpenIsSeparator,
                    token,
                    "bounds token is also listed in extra; its bounds role takes precedence",
                ));
            }
        }

        for (name, list) in [("extra", &self.extra), ("strip", &self.strip)] {
            let mut seen = HashSet::new();
            for token in list {
                if !token.is_empty() && !seen.insert(token.as_str()) {
                    issues.push(RuleIssue::new(
                        Severity::Warning,
                        IssueKind::Duplicate,
                        token,
                        format!("listed more than once in {name}"),
                    ));
                }
            }
        }

        issues
    }

    /// Fail on the first error, or on the first warning too when `strict`
    pub fn check(&self, strict: bool) -> Result<()> {
        let threshold = if strict {
            Severity::Warning
        } else {
            Severity::Error
        };

        match self
            .validate()
            .into_iter()
            .find(|issue| issue.severity >= threshold)
        {
            Some(issue) => Err(CoreError::InvalidRule {
                token: issue.token,
                reason: issue.message,
            }),
            None => Ok(()),
        }
    }
}
