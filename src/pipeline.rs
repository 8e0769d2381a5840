use crate::bitio::{read_up_to, BitReader, BitWriter};
use crate::codec::{header, ByteCounts, CodeTable, FrequencyTable, HuffmanTree, Step};
use crate::config::HuffConfig;
use crate::error::HuffError;
use log::{debug, info};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

#[derive(Debug)]
pub struct CompressionStats {
	pub original_size: u64,
	pub compressed_size: u64,
	pub header_size: u64,
	pub distinct_symbols: usize,
	pub ratio: f64,
}

#[derive(Debug)]
pub struct DecompressionStats {
	pub compressed_size: u64,
	pub decompressed_size: u64,
	pub distinct_symbols: usize,
}

/// What a stream header says about the data behind it.
#[derive(Debug, Clone)]
pub struct StreamInfo {
	pub distinct_symbols: usize,
	pub header_size: u64,
	pub max_code_length: usize,
	pub table: FrequencyTable,
}

/// Compresses everything from the reader's current position to its end.
///
/// The input is read twice: once for statistics, then again from the same
/// starting position to emit codes.
pub fn compress<R: Read + Seek, W: Write>(
	reader: &mut R,
	writer: &mut W,
	config: &HuffConfig,
) -> Result<CompressionStats, HuffError> {
	config.validate()?;
	let start = reader.stream_position()?;

	let counts = ByteCounts::from_reader(reader, config.buffer_size)?;
	let table = counts.to_probabilities();
	let tree = HuffmanTree::build(&table);
	let codes = CodeTable::derive(&tree);
	debug!(
		"scanned {} bytes, {} distinct symbols, max code length {}",
		counts.total(), table.len(), codes.max_len()
	);

	let header_size = header::write_table(writer, &table)?;

	reader.seek(SeekFrom::Start(start))?;
	let mut bits = BitWriter::with_capacity(writer, config.buffer_size);
	let mut buffer = vec![0u8; config.buffer_size];
	let mut encoded = 0u64;
	loop {
		let n = read_up_to(reader, &mut buffer)?;
		if n == 0 {
			break;
		}
		for &byte in &buffer[..n] {
			let code = codes.byte(byte).ok_or_else(|| HuffError::CompressionError(format!(
				"byte 0x{:02x} was not seen while scanning; input changed between passes", byte
			)))?;
			bits.write_bits(code.iter())?;
		}
		encoded += n as u64;
	}
	if encoded != counts.total() {
		return Err(HuffError::CompressionError(format!(
			"scanned {} bytes but encoded {}; input changed between passes", counts.total(), encoded
		)));
	}

	let end_of_stream = codes.end_of_stream()
		.ok_or_else(|| HuffError::CompressionError("tree has no end-of-stream code".to_string()))?;
	bits.write_bits(end_of_stream.iter())?;
	bits.flush()?;

	let original_size = counts.total();
	let compressed_size = header_size + bits.bytes_written();
	let ratio = if compressed_size > 0 { original_size as f64 / compressed_size as f64 } else { 0.0 };
	info!("compressed {} bytes into {} ({:.2}x)", original_size, compressed_size, ratio);

	Ok(CompressionStats {
		original_size,
		compressed_size,
		header_size,
		distinct_symbols: table.len(),
		ratio,
	})
}

pub fn decompress<R: Read, W: Write>(
	reader: &mut R,
	writer: &mut W,
	config: &HuffConfig,
) -> Result<DecompressionStats, HuffError> {
	config.validate()?;
	let decoded = header::read_table(reader)?;
	let header_size = header::header_size(decoded.table.len()) as u64;
	let tree = HuffmanTree::build(&decoded.table);
	debug!("rebuilt tree with {} leaves, depth {}", tree.leaf_count(), tree.max_depth());

	let mut counter = CountingReader::new(Cursor::new(decoded.overread).chain(reader));
	let mut bits = BitReader::with_capacity(&mut counter, config.buffer_size);
	let mut walker = tree.walker();
	let mut out = Vec::with_capacity(config.buffer_size);
	let mut decompressed_size = 0u64;

	loop {
		let Some(bit) = bits.read_bit()? else {
			debug!("bit stream exhausted after {} bytes (at root: {})", decompressed_size + out.len() as u64, walker.at_root());
			return Err(HuffError::TruncatedStream);
		};
		match walker.step(bit)? {
			Step::Descend => {}
			Step::Emit(byte) => {
				out.push(byte);
				if out.len() == config.buffer_size {
					writer.write_all(&out)?;
					decompressed_size += out.len() as u64;
					out.clear();
				}
			}
			Step::EndOfStream => break,
		}
	}
	writer.write_all(&out)?;
	writer.flush()?;
	decompressed_size += out.len() as u64;
	drop(bits);

	let compressed_size = header_size + counter.bytes_read();
	info!("decompressed {} bytes into {}", compressed_size, decompressed_size);

	Ok(DecompressionStats {
		compressed_size,
		decompressed_size,
		distinct_symbols: decoded.table.len(),
	})
}

/// Reads only the header.
pub fn info<R: Read>(reader: &mut R) -> Result<StreamInfo, HuffError> {
	let decoded = header::read_table(reader)?;
	let tree = HuffmanTree::build(&decoded.table);
	Ok(StreamInfo {
		distinct_symbols: decoded.table.len(),
		header_size: header::header_size(decoded.table.len()) as u64,
		max_code_length: tree.max_depth(),
		table: decoded.table,
	})
}

/// Decodes the whole stream and discards the output.
pub fn validate<R: Read>(reader: &mut R) -> Result<bool, HuffError> {
	decompress(reader, &mut io::sink(), &HuffConfig::default())?;
	Ok(true)
}

/// Counts the bytes pulled through it, so the body size is known without a
/// stored length.
struct CountingReader<R: Read> {
	inner: R,
	count: u64,
}

impl<R: Read> CountingReader<R> {
	fn new(inner: R) -> Self {
		Self { inner, count: 0 }
	}

	fn bytes_read(&self) -> u64 {
		self.count
	}
}

impl<R: Read> Read for CountingReader<R> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let n = self.inner.read(buf)?;
		self.count += n as u64;
		Ok(n)
	}
}
