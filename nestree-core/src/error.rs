//! Layered error types
//!
//! The grouping algorithm in lenient mode never fails. Errors come from rule
//! validation, strict grouping, pattern compilation and rule files.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the core library
#[derive(Error, Debug)]
pub enum CoreError {
    /// A rule set failed validation
    #[error("invalid rule for token {token:?}: {reason}")]
    InvalidRule {
        /// The offending token
        token: String,
        /// Why the rule was rejected
        reason: String,
    },

    /// Frames were still open when the input ended (strict mode only)
    #[error("unbalanced grouping: {depth} frame(s) still open, innermost opened by {open:?} at byte {offset}")]
    UnbalancedGrouping {
        /// Number of frames left open above the root
        depth: usize,
        /// Open token of the innermost unclosed frame
        open: String,
        /// Byte offset of that open token
        offset: usize,
    },

    /// A close token did not match the current frame (strict mode only)
    #[error("unexpected close token {token:?} at byte {offset}")]
    UnexpectedClose {
        /// The close token
        token: String,
        /// Byte offset of the token in the input
        offset: usize,
    },

    /// The token vocabulary could not be compiled into a pattern
    #[error("failed to compile token pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Rule file does not exist
    #[error("rules file not found: {}", .0.display())]
    RulesNotFound(PathBuf),

    /// I/O error while reading or writing a rule file
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Rule file is not valid JSON for a rule set
    #[error("invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        /// The rule file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// Rule file is not valid TOML for a rule set
    #[error("invalid TOML in {}: {source}", path.display())]
    InvalidToml {
        /// The rule file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: toml::de::Error,
    },

    /// Rules or a tree could not be serialized
    #[error("serialization error: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialize(err.to_string())
    }
}

impl From<toml::ser::Error> for CoreError {
    fn from(err: toml::ser::Error) -> Self {
        CoreError::Serialize(err.to_string())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rule_display() {
        let error = CoreError::InvalidRule {
            token: "|".to_string(),
            reason: "closes itself".to_string(),
        };
        assert_eq!(error.to_string(), "invalid rule for token \"|\": closes itself");
    }

    #[test]
    fn test_unbalanced_display() {
        let error = CoreError::UnbalancedGrouping {
            depth: 2,
            open: "(".to_string(),
            offset: 7,
        };
        let msg = error.to_string();
        assert!(msg.contains("2 frame(s) still open"));
        assert!(msg.contains("\"(\""));
        assert!(msg.contains("byte 7"));
    }

    #[test]
    fn test_rules_not_found_display() {
        let error = CoreError::RulesNotFound(PathBuf::from("missing.json"));
        assert_eq!(error.to_string(), "rules file not found: missing.json");
    }

    #[test]
    fn test_pattern_error_display() {
        let regex_err = regex::Regex::new("(").unwrap_err();
        let error: CoreError = regex_err.into();
        assert!(error
            .to_string()
            .starts_with("failed to compile token pattern:"));
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse_err = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
        let error: CoreError = parse_err.into();
        assert!(matches!(error, CoreError::Serialize(_)));
    }
}
