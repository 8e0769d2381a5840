pub mod codes;
pub mod frequency;
pub mod header;
pub mod tree;

pub use codes::{Code, CodeTable};
pub use frequency::{scale_probability, ByteCounts, FrequencyTable, PROBABILITY_SCALE};
pub use header::{header_size, read_table, write_table, DecodedHeader};
pub use tree::{compare_nodes, HuffmanTree, Node, Step, Symbol, TreeBuilder, TreeWalker};
