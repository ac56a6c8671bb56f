//! Grouping engine
//!
//! Folds split pieces into a nested tree with an explicit stack of frames.
//! Per non-empty piece, in order:
//!
//! 1. An open token pushes a new frame, attached to the current frame.
//! 2. Unless the token is stripped, it is appended to the (possibly new)
//!    current frame, so an open token renders as its frame's first element.
//! 3. If the current frame is not the root and the token is that frame's
//!    close token, the frame is popped.
//!
//! Frames live in an arena and the stack holds arena indices. Each frame
//! records the close token it waits for, so closing never depends on what
//! the frame happens to render first.

use crate::error::{CoreError, Result};
use crate::matcher::Piece;
use crate::tree::{Node, Tree};
use std::collections::{BTreeMap, HashSet};

/// How the engine treats unbalanced input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupingMode {
    /// Never fail: unclosed frames stay nested, stray closes become leaves
    #[default]
    Lenient,
    /// Report unclosed frames and stray close tokens as errors
    Strict,
}

const ROOT: usize = 0;

#[derive(Debug)]
enum Slot {
    Token(String),
    Frame(usize),
}

#[derive(Debug)]
struct Frame<'r, 't> {
    /// Open token and its byte offset; `None` for the root
    open: Option<(&'t str, usize)>,
    close: Option<&'r str>,
    elements: Vec<Slot>,
}

impl Frame<'_, '_> {
    fn root() -> Self {
        Self {
            open: None,
            close: None,
            elements: Vec::new(),
        }
    }
}

/// Stack-based grouping over a fixed rule set
#[derive(Debug, Clone)]
pub struct GroupingEngine<'r> {
    bounds: &'r BTreeMap<String, String>,
    closers: HashSet<&'r str>,
    strip: HashSet<&'r str>,
    mode: GroupingMode,
}

impl<'r> GroupingEngine<'r> {
    /// Create an engine for the given bounds and strip tokens
    pub fn new<S: AsRef<str>>(
        bounds: &'r BTreeMap<String, String>,
        strip: &'r [S],
        mode: GroupingMode,
    ) -> Self {
        Self {
            bounds,
            closers: bounds.values().map(String::as_str).collect(),
            strip: strip.iter().map(AsRef::as_ref).collect(),
            mode,
        }
    }

    /// The configured mode
    pub fn mode(&self) -> GroupingMode {
        self.mode
    }

    /// Fold pieces into a tree
    pub fn group<'t, I>(&self, pieces: I) -> Result<Tree>
    where
        I: IntoIterator<Item = Piece<'t>>,
    {
        let mut arena: Vec<Frame<'r, 't>> = vec![Frame::root()];
        let mut stack: Vec<usize> = vec![ROOT];
        let strict = self.mode == GroupingMode::Strict;

        for piece in pieces {
            if piece.is_empty() {
                continue;
            }
            let token = piece.text;

            if let Some(close) = self.bounds.get(token) {
                let index = arena.len();
                arena.push(Frame {
                    open: Some((token, piece.offset)),
                    close: Some(close.as_str()),
                    elements: Vec::new(),
                });
                arena[top(&stack)].elements.push(Slot::Frame(index));
                stack.push(index);
                log::trace!(
                    "open {:?} at byte {} (depth {})",
                    token,
                    piece.offset,
                    stack.len() - 1
                );
            }

            if !self.strip.contains(token) {
                arena[top(&stack)].elements.push(Slot::Token(token.to_string()));
            }

            if stack.len() > 1 && arena[top(&stack)].close == Some(token) {
                stack.pop();
                log::trace!(
                    "close {:?} at byte {} (depth {})",
                    token,
                    piece.offset,
                    stack.len() - 1
                );
            } else if strict && self.closers.contains(token) && !self.bounds.contains_key(token) {
                return Err(CoreError::UnexpectedClose {
                    token: token.to_string(),
                    offset: piece.offset,
                });
            }
        }

        let depth = stack.len() - 1;
        if depth > 0 {
            log::debug!("{depth} frame(s) left open at end of input");
            if strict {
                let (open, offset) = arena[top(&stack)].open.unwrap_or_default();
                return Err(CoreError::UnbalancedGrouping {
                    depth,
                    open: open.to_string(),
                    offset,
                });
            }
        }

        log::debug!("Grouped input into {} frame(s)", arena.len() - 1);
        Ok(materialize(arena))
    }
}

fn top(stack: &[usize]) -> usize {
    stack.last().copied().unwrap_or(ROOT)
}

/// Convert the arena into an owned tree. Children always have a larger index
/// than their parent, so building in reverse index order sees every child
/// before its parent.
fn materialize(mut arena: Vec<Frame<'_, '_>>) -> Tree {
    let mut built: Vec<Option<Vec<Node>>> = Vec::with_capacity(arena.len());
    built.resize_with(arena.len(), || None);

    for index in (0..arena.len()).rev() {
        let elements = std::mem::take(&mut arena[index].elements);
        let nodes = elements
            .into_iter()
            .map(|slot| match slot {
                Slot::Token(text) => Node::Token(text),
                Slot::Frame(child) => Node::Group(built[child].take().unwrap_or_default()),
            })
            .collect();
        built[index] = Some(nodes);
    }

    built
        .into_iter()
        .next()
        .flatten()
        .unwrap_or_default()
}
