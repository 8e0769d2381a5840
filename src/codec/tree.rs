//! Deterministic Huffman tree construction.
//!
//! Both ends of a stream build the tree from the same [`FrequencyTable`], so
//! every choice the builder makes must be reproducible. All ordering goes
//! through [`compare_nodes`]:
//!
//! 1. the end-of-stream leaf is greater than every other node;
//! 2. otherwise lighter nodes come first;
//! 3. equal weights: two leaves order by unsigned byte value (0x00 first,
//!    0xFF last), a leaf precedes an inner node, and two inner nodes order by
//!    their left children. Coders that rank bytes as signed values put
//!    0x80..=0xFF first and build different trees, so their streams are not
//!    interchangeable with these.
//!
//! Leaves and merged nodes wait in separate queues. When the heads of both
//! queues tie, the leaf is taken.

use crate::codec::frequency::FrequencyTable;
use crate::error::HuffError;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Byte(u8),
    EndOfStream,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: Symbol, weight: u64 },
    Inner { left: Box<Node>, right: Box<Node>, weight: u64 },
}

impl Node {
    pub fn leaf(byte: u8, weight: u64) -> Self {
        Node::Leaf { symbol: Symbol::Byte(byte), weight }
    }

    pub fn end_of_stream() -> Self {
        Node::Leaf { symbol: Symbol::EndOfStream, weight: 0 }
    }

    pub fn merge(left: Node, right: Node) -> Self {
        let weight = left.weight() + right.weight();
        Node::Inner { left: Box::new(left), right: Box::new(right), weight }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Inner { weight, .. } => *weight,
        }
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Node::Leaf { symbol: Symbol::EndOfStream, .. })
    }
}

pub fn compare_nodes(a: &Node, b: &Node) -> Ordering {
    match (a.is_end_of_stream(), b.is_end_of_stream()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    a.weight().cmp(&b.weight()).then_with(|| match (a, b) {
        // unsigned byte order; the end-of-stream symbol never gets here
        (Node::Leaf { symbol: x, .. }, Node::Leaf { symbol: y, .. }) => x.cmp(y),
        (Node::Leaf { .. }, Node::Inner { .. }) => Ordering::Less,
        (Node::Inner { .. }, Node::Leaf { .. }) => Ordering::Greater,
        (Node::Inner { left: x, .. }, Node::Inner { left: y, .. }) => compare_nodes(x, y),
    })
}

/// Heap entry that turns `BinaryHeap` into a min-queue under [`compare_nodes`].
struct Queued(Node);

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_nodes(&other.0, &self.0)
    }
}

pub struct TreeBuilder {
    leaves: BinaryHeap<Queued>,
    inner: BinaryHeap<Queued>,
}

impl TreeBuilder {
    /// Seeds the leaf queue with one leaf per table entry plus the end-of-stream leaf.
    pub fn new(table: &FrequencyTable) -> Self {
        let mut leaves: BinaryHeap<Queued> = table
            .iter()
            .map(|(byte, weight)| Queued(Node::leaf(byte, weight as u64)))
            .collect();
        leaves.push(Queued(Node::end_of_stream()));
        Self { leaves, inner: BinaryHeap::new() }
    }

    pub(crate) fn next_smallest(&mut self) -> Option<Node> {
        let take_leaf = match (self.leaves.peek(), self.inner.peek()) {
            (Some(leaf), Some(inner)) => compare_nodes(&leaf.0, &inner.0) != Ordering::Greater,
            (Some(_), None) => true,
            (None, _) => false,
        };
        let queue = if take_leaf { &mut self.leaves } else { &mut self.inner };
        queue.pop().map(|queued| queued.0)
    }

    pub fn build(mut self) -> HuffmanTree {
        while let Some(left) = self.next_smallest() {
            let Some(right) = self.next_smallest() else {
                // Last node standing. Without any byte leaves this is the
                // end-of-stream leaf on its own.
                return HuffmanTree { root: left };
            };
            self.inner.push(Queued(Node::merge(left, right)));
        }
        // unreachable: the end-of-stream leaf is always seeded
        HuffmanTree { root: Node::end_of_stream() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    pub fn build(table: &FrequencyTable) -> Self {
        TreeBuilder::new(table).build()
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of edges on the longest root-to-leaf path; a lone leaf still
    /// needs one bit.
    pub fn max_depth(&self) -> usize {
        fn depth(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Inner { left, right, .. } => 1 + depth(left).max(depth(right)),
            }
        }
        depth(&self.root).max(1)
    }

    pub fn leaf_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Inner { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }

    pub fn walker(&self) -> TreeWalker<'_> {
        TreeWalker { root: &self.root, current: &self.root }
    }
}

/// Outcome of feeding one bit to a [`TreeWalker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Inside a code; more bits are needed.
    Descend,
    /// A byte leaf was reached; the walker is back at the root.
    Emit(u8),
    /// The end-of-stream leaf was reached.
    EndOfStream,
}

/// Bit-by-bit decoder state: either at the root or part way down a code.
pub struct TreeWalker<'a> {
    root: &'a Node,
    current: &'a Node,
}

impl<'a> TreeWalker<'a> {
    pub fn at_root(&self) -> bool {
        std::ptr::eq(self.root, self.current)
    }

    pub fn step(&mut self, bit: bool) -> Result<Step, HuffError> {
        let current: &'a Node = self.current;
        let next: &'a Node = match current {
            Node::Inner { left, right, .. } => if bit { &**right } else { &**left },
            // A lone end-of-stream leaf is addressed by the single bit 1.
            Node::Leaf { .. } if bit => current,
            Node::Leaf { .. } => {
                return Err(HuffError::CorruptBody("0 is not a valid code in an empty-table stream".to_string()));
            }
        };
        match next {
            Node::Leaf { symbol: Symbol::EndOfStream, .. } => Ok(Step::EndOfStream),
            Node::Leaf { symbol: Symbol::Byte(byte), .. } => {
                self.current = self.root;
                Ok(Step::Emit(*byte))
            }
            Node::Inner { .. } => {
                self.current = next;
                Ok(Step::Descend)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(u8, u32)]) -> FrequencyTable {
        entries.iter().copied().collect()
    }

    fn leaf_symbol(node: &Node) -> Option<Symbol> {
        match node {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Inner { .. } => None,
        }
    }

    fn children(node: &Node) -> (&Node, &Node) {
        match node {
            Node::Inner { left, right, .. } => (left, right),
            Node::Leaf { .. } => panic!("expected an inner node"),
        }
    }

    #[test]
    fn test_compare_by_weight() {
        assert_eq!(compare_nodes(&Node::leaf(9, 1), &Node::leaf(0, 2)), Ordering::Less);
        let inner = Node::merge(Node::leaf(1, 1), Node::leaf(2, 1));
        assert_eq!(compare_nodes(&Node::leaf(0, 3), &inner), Ordering::Greater);
    }

    #[test]
    fn test_compare_leaf_ties_by_byte() {
        assert_eq!(compare_nodes(&Node::leaf(0x41, 5), &Node::leaf(0x42, 5)), Ordering::Less);
        assert_eq!(compare_nodes(&Node::leaf(0xFF, 5), &Node::leaf(0x00, 5)), Ordering::Greater);
        assert_eq!(compare_nodes(&Node::leaf(7, 5), &Node::leaf(7, 5)), Ordering::Equal);
    }

    #[test]
    fn test_high_bytes_order_after_low_bytes() {
        assert_eq!(compare_nodes(&Node::leaf(0x80, 5), &Node::leaf(0x7F, 5)), Ordering::Greater);
        let tree = HuffmanTree::build(&table(&[(0x80, 5), (0x7F, 5)]));
        let (pair, _) = children(tree.root());
        let (first, second) = children(pair);
        assert_eq!(leaf_symbol(first), Some(Symbol::Byte(0x7F)));
        assert_eq!(leaf_symbol(second), Some(Symbol::Byte(0x80)));
    }

    #[test]
    fn test_compare_leaf_before_inner_on_tie() {
        let inner = Node::merge(Node::leaf(1, 2), Node::leaf(2, 2));
        let leaf = Node::leaf(0xFF, 4);
        assert_eq!(compare_nodes(&leaf, &inner), Ordering::Less);
        assert_eq!(compare_nodes(&inner, &leaf), Ordering::Greater);
    }

    #[test]
    fn test_compare_inner_ties_by_left_child() {
        let a = Node::merge(Node::leaf(1, 2), Node::leaf(9, 2));
        let b = Node::merge(Node::leaf(3, 1), Node::leaf(4, 3));
        // equal weights; left children 1 (weight 2) vs 3 (weight 1)
        assert_eq!(compare_nodes(&a, &b), Ordering::Greater);
        let c = Node::merge(Node::leaf(5, 2), Node::leaf(0, 2));
        assert_eq!(compare_nodes(&a, &c), Ordering::Less);
    }

    #[test]
    fn test_end_of_stream_is_largest() {
        let eos = Node::end_of_stream();
        assert_eq!(compare_nodes(&eos, &Node::leaf(0, 0)), Ordering::Greater);
        assert_eq!(compare_nodes(&Node::leaf(0, 10_000_000), &eos), Ordering::Less);
        let inner = Node::merge(Node::leaf(1, 0), Node::leaf(2, 0));
        assert_eq!(compare_nodes(&eos, &inner), Ordering::Greater);
        assert_eq!(compare_nodes(&eos, &Node::end_of_stream()), Ordering::Equal);
    }

    #[test]
    fn test_next_smallest_prefers_leaf_on_tie() {
        let mut builder = TreeBuilder::new(&table(&[(0x10, 2), (0x20, 2), (0x30, 4)]));
        let first = builder.next_smallest().unwrap();
        let second = builder.next_smallest().unwrap();
        assert_eq!(leaf_symbol(&first), Some(Symbol::Byte(0x10)));
        assert_eq!(leaf_symbol(&second), Some(Symbol::Byte(0x20)));
        builder.inner.push(Queued(Node::merge(first, second)));
        // leaf 0x30 and the merged node both weigh 4
        let third = builder.next_smallest().unwrap();
        assert_eq!(leaf_symbol(&third), Some(Symbol::Byte(0x30)));
        let fourth = builder.next_smallest().unwrap();
        assert_eq!(fourth.weight(), 4);
        assert!(leaf_symbol(&fourth).is_none());
        assert!(builder.next_smallest().unwrap().is_end_of_stream());
        assert!(builder.next_smallest().is_none());
    }

    #[test]
    fn test_two_symbol_scenario() {
        let tree = HuffmanTree::build(&table(&[(0x41, 7_500_000), (0x42, 2_500_000)]));
        let (low, eos) = children(tree.root());
        assert!(eos.is_end_of_stream());
        let (b, a) = children(low);
        assert_eq!(leaf_symbol(b), Some(Symbol::Byte(0x42)));
        assert_eq!(leaf_symbol(a), Some(Symbol::Byte(0x41)));
        assert_eq!(tree.root().weight(), 10_000_000);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.max_depth(), 2);
    }

    #[test]
    fn test_empty_table_is_lone_end_of_stream() {
        let tree = HuffmanTree::build(&FrequencyTable::new());
        assert!(tree.root().is_end_of_stream());
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.max_depth(), 1);
    }

    #[test]
    fn test_single_symbol_pairs_with_end_of_stream() {
        let tree = HuffmanTree::build(&table(&[(0x61, 10_000_000)]));
        let (left, right) = children(tree.root());
        assert_eq!(leaf_symbol(left), Some(Symbol::Byte(0x61)));
        assert!(right.is_end_of_stream());
    }

    #[test]
    fn test_end_of_stream_merged_last() {
        let entries: Vec<(u8, u32)> = (0..40u8).map(|b| (b, (b as u32 % 7) * 1000)).collect();
        let tree = HuffmanTree::build(&table(&entries));
        let (_, right) = children(tree.root());
        assert!(right.is_end_of_stream());
        assert_eq!(tree.leaf_count(), 41);
    }

    #[test]
    fn test_zero_weight_bytes_tie_by_value() {
        let tree = HuffmanTree::build(&table(&[(0x05, 0), (0x03, 0), (0x09, 10)]));
        // 0x03 and 0x05 merge first, in byte order
        let (rest, eos) = children(tree.root());
        assert!(eos.is_end_of_stream());
        let (zeros, nine) = children(rest);
        assert_eq!(leaf_symbol(nine), Some(Symbol::Byte(0x09)));
        let (first, second) = children(zeros);
        assert_eq!(leaf_symbol(first), Some(Symbol::Byte(0x03)));
        assert_eq!(leaf_symbol(second), Some(Symbol::Byte(0x05)));
    }

    #[test]
    fn test_build_is_deterministic() {
        let entries: Vec<(u8, u32)> = (0..=255u8).map(|b| (b, 39_062 + (b as u32 % 3))).collect();
        assert_eq!(HuffmanTree::build(&table(&entries)), HuffmanTree::build(&table(&entries)));
    }

    #[test]
    fn test_walker_states() {
        let tree = HuffmanTree::build(&table(&[(0x41, 7_500_000), (0x42, 2_500_000)]));
        let mut walker = tree.walker();
        assert!(walker.at_root());
        assert_eq!(walker.step(false).unwrap(), Step::Descend);
        assert!(!walker.at_root());
        assert_eq!(walker.step(true).unwrap(), Step::Emit(0x41));
        assert!(walker.at_root());
        assert_eq!(walker.step(false).unwrap(), Step::Descend);
        assert_eq!(walker.step(false).unwrap(), Step::Emit(0x42));
        assert_eq!(walker.step(true).unwrap(), Step::EndOfStream);
    }

    #[test]
    fn test_walker_lone_end_of_stream() {
        let tree = HuffmanTree::build(&FrequencyTable::new());
        assert_eq!(tree.walker().step(true).unwrap(), Step::EndOfStream);
        assert!(matches!(tree.walker().step(false), Err(HuffError::CorruptBody(_))));
    }
}
