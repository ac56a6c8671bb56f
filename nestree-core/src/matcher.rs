//! Token pattern builder
//!
//! Compiles the rule vocabulary (open tokens, close tokens and separators)
//! into one alternation of escaped literals. Alternatives are ordered longest
//! first, ties broken by reverse lexical order, so a token always wins over
//! any shorter token it contains: with both `"<"` and `"<="` present,
//! `"<="` matches. The regex engine takes the first alternative that matches
//! at the leftmost position, which makes this order the match priority.

use crate::error::Result;
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Kind of a split piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    /// Unrecognized text between tokens (possibly empty)
    Content,
    /// A recognized vocabulary token
    Token,
}

/// One piece of split text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece<'a> {
    /// Whether this piece is content or a token
    pub kind: PieceKind,
    /// The text of the piece
    pub text: &'a str,
    /// Byte offset of the piece in the input
    pub offset: usize,
}

impl<'a> Piece<'a> {
    fn content(text: &'a str, offset: usize) -> Self {
        Self {
            kind: PieceKind::Content,
            text,
            offset,
        }
    }

    fn token(text: &'a str, offset: usize) -> Self {
        Self {
            kind: PieceKind::Token,
            text,
            offset,
        }
    }

    /// Whether the piece has no text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Compiled token matcher
#[derive(Debug, Clone)]
pub struct Matcher {
    vocabulary: Vec<String>,
    regex: Option<Regex>,
}

/// Compiled size limit for the token pattern (the `regex` default)
const PATTERN_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Longest first, then reverse lexical
fn priority(a: &str, b: &str) -> Ordering {
    b.chars()
        .count()
        .cmp(&a.chars().count())
        .then_with(|| b.cmp(a))
}

impl Matcher {
    /// Build a matcher for every bounds key and value plus the separators
    pub fn new<S: AsRef<str>>(
        bounds: &BTreeMap<String, String>,
        separators: &[S],
    ) -> Result<Self> {
        Self::from_tokens(
            bounds
                .iter()
                .flat_map(|(open, close)| [open.as_str(), close.as_str()])
                .chain(separators.iter().map(AsRef::as_ref)),
        )
    }

    /// Build a matcher from an arbitrary token list. Duplicates collapse and
    /// empty tokens are ignored.
    ///
    /// Fails with [`CoreError::Pattern`](crate::CoreError::Pattern) when the
    /// vocabulary is too large to compile.
    pub fn from_tokens<'t, I>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'t str>,
    {
        Self::with_size_limit(tokens, PATTERN_SIZE_LIMIT)
    }

    fn with_size_limit<'t, I>(tokens: I, size_limit: usize) -> Result<Self>
    where
        I: IntoIterator<Item = &'t str>,
    {
        let unique: BTreeSet<&str> = tokens.into_iter().collect();
        if unique.contains("") {
            log::warn!("Ignoring empty token in rule vocabulary");
        }

        let mut vocabulary: Vec<String> = unique
            .into_iter()
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();
        vocabulary.sort_by(|a, b| priority(a, b));

        let regex = if vocabulary.is_empty() {
            None
        } else {
            let pattern = vocabulary
                .iter()
                .map(|token| regex::escape(token))
                .collect::<Vec<_>>()
                .join("|");
            Some(RegexBuilder::new(&pattern).size_limit(size_limit).build()?)
        };

        log::debug!("Built matcher over {} token(s)", vocabulary.len());

        Ok(Self { vocabulary, regex })
    }

    /// Tokens in match priority order
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// The compiled pattern, if any token is recognized
    pub fn pattern(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }

    /// Split `text` into alternating content and token pieces.
    ///
    /// The result always starts and ends with a content piece, and content
    /// pieces are kept even when empty, so token pieces sit at the odd
    /// indices.
    pub fn split<'a>(&self, text: &'a str) -> Vec<Piece<'a>> {
        let Some(regex) = &self.regex else {
            return vec![Piece::content(text, 0)];
        };

        let mut pieces = Vec::new();
        let mut last = 0;
        for found in regex.find_iter(text) {
            pieces.push(Piece::content(&text[last..found.start()], last));
            pieces.push(Piece::token(found.as_str(), found.start()));
            last = found.end();
        }
        pieces.push(Piece::content(&text[last..], last));
        pieces
    }
}
