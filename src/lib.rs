//! # huffc
//!
//! Lossless byte-stream compression with a static Huffman code.
//!
//! A compressed stream is a small header holding a fixed-point probability
//! for every byte value present in the input, followed by the bit-packed
//! codes of the input bytes and a final end-of-stream code. No length is
//! stored: the decoder rebuilds the exact same tree from the header and stops
//! when it reaches the end-of-stream leaf.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffc::{compress_data, decompress_data};
//!
//! let original = b"Hello, world! This is test data.";
//! let compressed = compress_data(original).unwrap();
//! let decompressed = decompress_data(&compressed).unwrap();
//! assert_eq!(original.to_vec(), decompressed);
//! ```
//!
//! ### Working with Files
//!
//! ```rust
//! use huffc::{pipeline, HuffConfig};
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HuffConfig::default();
//!
//! let mut reader = BufReader::new(File::open("input.txt")?);
//! let mut writer = BufWriter::new(File::create("output.huf")?);
//!
//! let stats = pipeline::compress(&mut reader, &mut writer, &config)?;
//! println!("Compression ratio: {:.2}x", stats.ratio);
//! # Ok(())
//! # }
//! ```

pub mod bitio;
pub mod cli;
pub mod codec;
pub mod config;
pub mod dump;
pub mod error;
pub mod pipeline;

// Re-export commonly used types for convenience
pub use config::{HuffConfig, Operation};
pub use error::{HuffError, Result};
pub use pipeline::{compress, decompress, CompressionStats, DecompressionStats, StreamInfo};
pub use codec::{CodeTable, FrequencyTable, HuffmanTree};

use std::io::Cursor;

/// Compress data in memory.
///
/// For large files use the streaming [`pipeline::compress`], which reads its
/// input twice instead of holding it in memory.
///
/// # Example
///
/// ```rust
/// use huffc::compress_data;
///
/// let compressed = compress_data(b"AAAB").unwrap();
/// assert_eq!(compressed.len(), 11);
/// ```
pub fn compress_data(data: &[u8]) -> Result<Vec<u8>> {
    let mut input = Cursor::new(data);
    let mut output = Vec::new();

    pipeline::compress(&mut input, &mut output, &HuffConfig::default())?;
    Ok(output)
}

/// Decompress a stream held in memory.
///
/// # Example
///
/// ```rust
/// use huffc::{compress_data, decompress_data};
///
/// let compressed = compress_data(b"Hello, world!").unwrap();
/// assert_eq!(decompress_data(&compressed).unwrap(), b"Hello, world!".to_vec());
/// ```
pub fn decompress_data(compressed_data: &[u8]) -> Result<Vec<u8>> {
    let mut input = Cursor::new(compressed_data);
    let mut output = Vec::new();

    pipeline::decompress(&mut input, &mut output, &HuffConfig::default())?;
    Ok(output)
}

/// Read the header of a compressed stream without decoding the body.
///
/// # Example
///
/// ```rust
/// use huffc::{compress_data, get_stream_info};
///
/// let compressed = compress_data(b"abracadabra").unwrap();
/// let info = get_stream_info(&compressed).unwrap();
/// assert_eq!(info.distinct_symbols, 5);
/// assert_eq!(info.header_size, 21);
/// ```
pub fn get_stream_info(compressed_data: &[u8]) -> Result<StreamInfo> {
    let mut input = Cursor::new(compressed_data);
    pipeline::info(&mut input)
}

/// Check that a stream decodes all the way to its end-of-stream marker.
///
/// Returns `true` if the data is valid, or the error that stopped decoding.
pub fn validate_data(compressed_data: &[u8]) -> Result<bool> {
    let mut input = Cursor::new(compressed_data);
    pipeline::validate(&mut input)
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: VERSION,
        authors: AUTHORS,
        description: DESCRIPTION,
    }
}

#[derive(Debug, Clone)]
pub struct VersionInfo {
    pub version: &'static str,
    pub authors: &'static str,
    pub description: &'static str,
}
