//! Result tree
//!
//! A tree is a sequence of nodes; each node is either a leaf token or a
//! nested group. Groups created by an open token carry that token as their
//! first element unless it was stripped. Serialized, a tree is nested JSON
//! arrays of strings.

use serde::{Deserialize, Serialize};

/// Element of a result tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Leaf token
    Token(String),
    /// Nested group
    Group(Vec<Node>),
}

/// Root-level node sequence
pub type Tree = Vec<Node>;

impl Node {
    /// Leaf token node
    pub fn token(text: impl Into<String>) -> Self {
        Node::Token(text.into())
    }

    /// Group node
    pub fn group(children: Vec<Node>) -> Self {
        Node::Group(children)
    }

    /// Text of a leaf token
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Node::Token(text) => Some(text),
            Node::Group(_) => None,
        }
    }

    /// Children of a group
    pub fn as_group(&self) -> Option<&[Node]> {
        match self {
            Node::Token(_) => None,
            Node::Group(children) => Some(children),
        }
    }

    /// Rendered open token of a group: its first element when that is a leaf
    pub fn opener(&self) -> Option<&str> {
        self.as_group()
            .and_then(|children| children.first())
            .and_then(Node::as_token)
    }
}

impl Drop for Node {
    // Unnest iteratively; the derived drop would recurse once per level
    fn drop(&mut self) {
        let mut pending = match self {
            Node::Group(children) if children.iter().any(|c| c.as_group().is_some()) => {
                std::mem::take(children)
            }
            _ => return,
        };
        while let Some(mut node) = pending.pop() {
            if let Node::Group(children) = &mut node {
                pending.append(children);
            }
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::token(text)
    }
}

impl From<Vec<Node>> for Node {
    fn from(children: Vec<Node>) -> Self {
        Node::group(children)
    }
}

/// Shape summary of a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Leaf tokens at any depth
    pub tokens: usize,
    /// Groups at any depth
    pub groups: usize,
    /// Deepest group nesting; 0 for a flat tree
    pub max_depth: usize,
}

/// Count tokens, groups and nesting depth
pub fn stats(nodes: &[Node]) -> TreeStats {
    let mut acc = TreeStats::default();
    let mut pending: Vec<std::slice::Iter<'_, Node>> = vec![nodes.iter()];
    while let Some(iter) = pending.last_mut() {
        match iter.next() {
            Some(Node::Token(_)) => acc.tokens += 1,
            Some(Node::Group(children)) => {
                acc.groups += 1;
                pending.push(children.iter());
                // The root sequence is depth 0
                acc.max_depth = acc.max_depth.max(pending.len() - 1);
            }
            None => {
                pending.pop();
            }
        }
    }
    acc
}

/// Leaf tokens in document order
pub fn flatten(nodes: &[Node]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut pending: Vec<std::slice::Iter<'_, Node>> = vec![nodes.iter()];
    while let Some(iter) = pending.last_mut() {
        match iter.next() {
            Some(Node::Token(text)) => out.push(text.as_str()),
            Some(Node::Group(children)) => pending.push(children.iter()),
            None => {
                pending.pop();
            }
        }
    }
    out
}
