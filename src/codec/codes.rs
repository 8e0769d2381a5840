use crate::codec::tree::{HuffmanTree, Node, Symbol};
use std::collections::BTreeMap;
use std::fmt;

/// Root-to-leaf path; `false` is a left edge, `true` a right edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Code>,
}

impl CodeTable {
    /// Assigns every leaf its path in one top-down pass over the finished tree.
    pub fn derive(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        match tree.root() {
            Node::Leaf { symbol, .. } => {
                codes.insert(*symbol, Code { bits: vec![true] });
            }
            root => {
                let mut path = Code::new();
                collect(root, &mut path, &mut codes);
            }
        }
        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn byte(&self, byte: u8) -> Option<&Code> {
        self.get(Symbol::Byte(byte))
    }

    pub fn end_of_stream(&self) -> Option<&Code> {
        self.get(Symbol::EndOfStream)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes.iter().map(|(symbol, code)| (*symbol, code))
    }

    pub fn max_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }
}

fn collect(node: &Node, path: &mut Code, codes: &mut BTreeMap<Symbol, Code>) {
    match node {
        Node::Leaf { symbol, .. } => {
            codes.insert(*symbol, path.clone());
        }
        Node::Inner { left, right, .. } => {
            path.bits.push(false);
            collect(left, path, codes);
            path.bits.pop();
            path.bits.push(true);
            collect(right, path, codes);
            path.bits.pop();
        }
    }
}
