//! Outline output formatter

use super::OutputFormatter;
use anyhow::Result;
use nestree_core::{Node, Tree};
use std::io::Write;

/// Outline formatter - one token per line, groups indented between brackets
pub struct OutlineFormatter<W: Write> {
    writer: W,
    trees: Vec<(String, Tree)>,
}

impl<W: Write> OutlineFormatter<W> {
    /// Create a new outline formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            trees: Vec::new(),
        }
    }

    /// Consume the formatter and return the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_nodes(&mut self, nodes: &[Node]) -> Result<()> {
        let mut pending: Vec<std::slice::Iter<'_, Node>> = vec![nodes.iter()];
        while !pending.is_empty() {
            let depth = pending.len() - 1;
            match pending[depth].next() {
                // Debug formatting keeps newlines and spaces visible
                Some(Node::Token(text)) => {
                    writeln!(self.writer, "{}{text:?}", "  ".repeat(depth))?
                }
                Some(Node::Group(children)) => {
                    writeln!(self.writer, "{}[", "  ".repeat(depth))?;
                    pending.push(children.iter());
                }
                None => {
                    pending.pop();
                    if let Some(parent) = depth.checked_sub(1) {
                        writeln!(self.writer, "{}]", "  ".repeat(parent))?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<W: Write + Send + Sync> OutputFormatter for OutlineFormatter<W> {
    fn format_tree(&mut self, source: &str, tree: Tree) -> Result<()> {
        self.trees.push((source.to_string(), tree));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let mut trees = std::mem::take(&mut self.trees);
        trees.sort_by(|a, b| a.0.cmp(&b.0));
        let labelled = trees.len() > 1;

        for (index, (source, tree)) in trees.iter().enumerate() {
            if labelled {
                if index > 0 {
                    writeln!(self.writer)?;
                }
                writeln!(self.writer, "== {source} ==")?;
            }
            self.write_nodes(tree)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_nesting() {
        let mut formatter = OutlineFormatter::new(Vec::new());
        let tree = vec![
            Node::token("f"),
            Node::group(vec![Node::token("("), Node::token("x y"), Node::token(")")]),
            Node::token("\n"),
        ];
        formatter.format_tree("in.txt", tree).unwrap();
        formatter.finish().unwrap();

        let out = String::from_utf8(formatter.into_inner()).unwrap();
        assert_eq!(out, "\"f\"\n[\n  \"(\"\n  \"x y\"\n  \")\"\n]\n\"\\n\"\n");
    }

    #[test]
    fn test_outline_labels_multiple_inputs() {
        let mut formatter = OutlineFormatter::new(Vec::new());
        formatter
            .format_tree("b.txt", vec![Node::token("b")])
            .unwrap();
        formatter
            .format_tree("a.txt", vec![Node::token("a")])
            .unwrap();
        formatter.finish().unwrap();

        let out = String::from_utf8(formatter.into_inner()).unwrap();
        assert_eq!(out, "== a.txt ==\n\"a\"\n\n== b.txt ==\n\"b\"\n");
    }
}
