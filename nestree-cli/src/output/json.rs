//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use nestree_core::Tree;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// JSON formatter - a bare tree for one input, an object keyed by input path
/// for several
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    trees: BTreeMap<String, Tree>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            trees: BTreeMap::new(),
        }
    }

    /// Consume the formatter and return the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_value<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value)?;
        } else {
            serde_json::to_writer(&mut self.writer, value)?;
        }
        Ok(())
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_tree(&mut self, source: &str, tree: Tree) -> Result<()> {
        self.trees.insert(source.to_string(), tree);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let trees = std::mem::take(&mut self.trees);
        if trees.len() == 1 {
            if let Some(tree) = trees.into_values().next() {
                self.write_value(&tree)?;
            }
        } else {
            self.write_value(&trees)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
