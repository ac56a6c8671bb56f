//! Rule-driven bracket-matching tokenizer
//!
//! This crate splits flat text on a small set of literal tokens and folds the
//! resulting token stream into a nested tree. Grouping is driven entirely by
//! the rule set; no grammar is involved.
//!
//! # Architecture
//!
//! Data flows one way: rules → matcher → split pieces → tree.
//! - [`rules`]: the rule set, its validation and rule files
//! - [`matcher`]: compiles the token vocabulary into a longest-first pattern
//! - [`engine`]: folds pieces into frames with an explicit stack
//! - [`tree`]: the result tree and helpers
//! - [`processor`]: [`TreeParser`], the reusable entry point
//!
//! # Example
//!
//! ```rust
//! use nestree_core::{RuleSet, TreeParser};
//!
//! let rules = RuleSet::builder()
//!     .bound("(", ")")
//!     .extra("+")
//!     .strip(" ")
//!     .build();
//!
//! let parser = TreeParser::new(rules).unwrap();
//! let tree = parser.parse("(a + b)").unwrap();
//!
//! assert_eq!(
//!     serde_json::to_string(&tree).unwrap(),
//!     r#"[["(","a","+","b",")"]]"#
//! );
//! ```

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod matcher;
pub mod processor;
pub mod rules;
pub mod tree;

// Re-export key types
pub use engine::{GroupingEngine, GroupingMode};
pub use error::{CoreError, Result};
pub use matcher::{Matcher, Piece, PieceKind};
pub use processor::{build_matcher, generate_tree, TreeParser, TreeParserBuilder};
pub use rules::{normalize_and_persist, IssueKind, RuleIssue, RuleSet, RuleSetBuilder, Severity};
pub use tree::{Node, Tree, TreeStats};
