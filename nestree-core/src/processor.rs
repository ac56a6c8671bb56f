//! Reusable tree parser
//!
//! `TreeParser` compiles the matcher once and can then parse any number of
//! texts, from any number of threads.

use crate::engine::{GroupingEngine, GroupingMode};
use crate::error::Result;
use crate::matcher::Matcher;
use crate::rules::RuleSet;
use crate::tree::Tree;
use std::collections::BTreeMap;

/// Compiled rules ready to parse text
#[derive(Debug, Clone)]
pub struct TreeParser {
    rules: RuleSet,
    matcher: Matcher,
    mode: GroupingMode,
}

impl TreeParser {
    /// Create a lenient parser for the given rules
    pub fn new(rules: RuleSet) -> Result<Self> {
        Self::with_mode(rules, GroupingMode::Lenient)
    }

    /// Create a parser with an explicit grouping mode
    pub fn with_mode(rules: RuleSet, mode: GroupingMode) -> Result<Self> {
        let matcher = Matcher::new(&rules.bounds, &rules.separators())?;
        Ok(Self {
            rules,
            matcher,
            mode,
        })
    }

    /// Create a builder
    pub fn builder() -> TreeParserBuilder {
        TreeParserBuilder::default()
    }

    /// The rules this parser was built from
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The compiled matcher
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// The grouping mode
    pub fn mode(&self) -> GroupingMode {
        self.mode
    }

    /// Split and group `text`. Lenient parsers never return an error.
    pub fn parse(&self, text: &str) -> Result<Tree> {
        let pieces = self.matcher.split(text);
        log::trace!("Split {} byte(s) into {} piece(s)", text.len(), pieces.len());

        GroupingEngine::new(&self.rules.bounds, &self.rules.strip, self.mode).group(pieces)
    }
}

/// Builder for [`TreeParser`]
#[derive(Debug, Default)]
pub struct TreeParserBuilder {
    rules: RuleSet,
    mode: GroupingMode,
    strict_rules: bool,
}

impl TreeParserBuilder {
    /// Set the rules
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Set the grouping mode
    pub fn mode(mut self, mode: GroupingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for strict grouping
    pub fn strict(self, strict: bool) -> Self {
        self.mode(if strict {
            GroupingMode::Strict
        } else {
            GroupingMode::Lenient
        })
    }

    /// Reject rule sets with warnings as well as errors
    pub fn strict_rules(mut self, strict: bool) -> Self {
        self.strict_rules = strict;
        self
    }

    /// Validate the rules and build the parser
    pub fn build(self) -> Result<TreeParser> {
        for issue in self.rules.validate() {
            log::warn!("{issue}");
        }
        self.rules.check(self.strict_rules)?;
        TreeParser::with_mode(self.rules, self.mode)
    }
}

/// Build a matcher for the bounds and separator tokens
pub fn build_matcher<S: AsRef<str>>(
    bounds: &BTreeMap<String, String>,
    separators: &[S],
) -> Result<Matcher> {
    Matcher::new(bounds, separators)
}

/// Split `text` on the bounds and separator tokens and group it leniently.
///
/// Lenient grouping never fails, so the only error is a vocabulary too large
/// to compile.
pub fn generate_tree<S: AsRef<str>, T: AsRef<str>>(
    text: &str,
    bounds: &BTreeMap<String, String>,
    separators: &[S],
    strip: &[T],
) -> Result<Tree> {
    let matcher = Matcher::new(bounds, separators)?;
    GroupingEngine::new(bounds, strip, GroupingMode::Lenient).group(matcher.split(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::tree::Node;

    fn arithmetic_rules() -> RuleSet {
        RuleSet::builder()
            .bound("(", ")")
            .extra("+")
            .extra("-")
            .strip("\n")
            .strip(" ")
            .build()
    }

    #[test]
    fn test_default_parser_splits_on_newline() {
        let parser = TreeParser::new(RuleSet::default()).unwrap();
        let tree = parser.parse("a\nb").unwrap();
        assert_eq!(
            tree,
            vec![Node::token("a"), Node::token("\n"), Node::token("b")]
        );
    }

    #[test]
    fn test_parse_with_rules() {
        let parser = TreeParser::new(arithmetic_rules()).unwrap();
        let tree = parser.parse("(a + b)").unwrap();
        assert_eq!(
            serde_json::to_string(&tree).unwrap(),
            r#"[["(","a","+","b",")"]]"#
        );
    }

    #[test]
    fn test_builder_strict_mode() {
        let parser = TreeParser::builder()
            .rules(arithmetic_rules())
            .strict(true)
            .build()
            .unwrap();
        assert_eq!(parser.mode(), GroupingMode::Strict);
        assert!(matches!(
            parser.parse("(a"),
            Err(CoreError::UnbalancedGrouping { depth: 1, .. })
        ));
    }

    #[test]
    fn test_builder_rejects_invalid_rules() {
        let rules = RuleSet::builder().bound("|", "|").build();
        assert!(TreeParser::builder().rules(rules.clone()).build().is_ok());
        assert!(TreeParser::builder()
            .rules(rules)
            .strict_rules(true)
            .build()
            .is_err());
    }

    #[test]
    fn test_generate_tree_matches_parser() {
        let rules = arithmetic_rules();
        let separators = rules.separators();
        let text = "x - (y + (z))\n";

        let tree = generate_tree(text, &rules.bounds, &separators, &rules.strip).unwrap();
        let parser = TreeParser::new(rules).unwrap();
        assert_eq!(tree, parser.parse(text).unwrap());
    }

    #[test]
    fn test_build_matcher_vocabulary() {
        let rules = arithmetic_rules();
        let matcher = build_matcher(&rules.bounds, &rules.separators()).unwrap();
        assert_eq!(matcher.vocabulary().len(), 6);
    }

    #[test]
    fn test_parser_is_shareable_across_threads() {
        let parser = TreeParser::new(arithmetic_rules()).unwrap();
        let inputs = ["(a)", "(b + c)", "d", "((e))"];

        let trees: Vec<Tree> = std::thread::scope(|scope| {
            let handles: Vec<_> = inputs
                .iter()
                .map(|text| {
                    let parser = &parser;
                    scope.spawn(move || parser.parse(text).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (text, tree) in inputs.iter().zip(trees) {
            assert_eq!(tree, parser.parse(text).unwrap());
        }
    }
}
