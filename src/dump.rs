//! Human-readable renderings of a table and its tree, for debugging only.
//! Nothing in the codec reads these back.

use crate::codec::{FrequencyTable, HuffmanTree, Node, Symbol};
use std::collections::VecDeque;
use std::io::{self, Write};

/// Writes the tree as a Graphviz digraph.
///
/// Nodes are numbered `N0`, `N1`, ... in breadth-first order; edges carry the
/// bit they stand for.
pub fn write_tree_dot<W: Write>(tree: &HuffmanTree, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "digraph G {{")?;
    let mut counter = 0usize;
    let mut queue = VecDeque::new();
    queue.push_back((counter, tree.root()));
    counter += 1;

    while let Some((key, node)) = queue.pop_front() {
        match node {
            Node::Leaf { symbol, .. } => {
                writeln!(writer, "N{} [label=\"{}\"];", key, symbol_label(*symbol))?;
            }
            Node::Inner { left, right, .. } => {
                writeln!(writer, "N{} [label=\"\"];", key)?;
                for (bit, child) in [(0, &**left), (1, &**right)] {
                    writeln!(writer, "N{} -> N{} [label=\"{}\"];", key, counter, bit)?;
                    queue.push_back((counter, child));
                    counter += 1;
                }
            }
        }
    }
    writeln!(writer, "t [label=\"Total Nodes: {}\"];", counter)?;
    writeln!(writer, "}}")?;
    writer.flush()
}

/// Writes one `0x<hex>, <weight>` line per table entry.
pub fn write_table_text<W: Write>(table: &FrequencyTable, writer: &mut W) -> io::Result<()> {
    for (byte, weight) in table.iter() {
        writeln!(writer, "0x{:02x}, {}", byte, weight)?;
    }
    writer.flush()
}

fn symbol_label(symbol: Symbol) -> String {
    match symbol {
        Symbol::Byte(byte) => format!("0x{:02x}", byte),
        Symbol::EndOfStream => "EOS".to_string(),
    }
}
