use crate::bitio::read_up_to;
use crate::codec::frequency::FrequencyTable;
use crate::error::HuffError;
use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};
use log::trace;
use std::io::{ErrorKind, Read, Write};

/// Bytes per table entry: one symbol byte plus a big-endian u24 weight.
pub const ENTRY_SIZE: usize = 4;

pub const MAX_WEIGHT: u32 = 0x00FF_FFFF;

const FULL_TABLE_BYTES: usize = 256 * ENTRY_SIZE;

pub fn header_size(distinct: usize) -> usize {
	1 + ENTRY_SIZE * distinct
}

/// A parsed header.
///
/// `overread` holds the body byte consumed while telling an empty table apart
/// from a full one (both carry a count byte of zero). It belongs in front of
/// whatever the reader yields next.
#[derive(Debug)]
pub struct DecodedHeader {
	pub table: FrequencyTable,
	pub overread: Vec<u8>,
}

pub fn write_table<W: Write>(writer: &mut W, table: &FrequencyTable) -> Result<u64, HuffError> {
	if let Some((byte, weight)) = table.iter().find(|&(_, weight)| weight > MAX_WEIGHT) {
		return Err(HuffError::CompressionError(format!(
			"weight {} of symbol 0x{:02x} does not fit in 24 bits", weight, byte
		)));
	}
	// 256 entries wrap to a count byte of 0
	writer.write_u8(table.len() as u8)?;
	for (byte, weight) in table.iter() {
		writer.write_u8(byte)?;
		writer.write_u24::<BigEndian>(weight)?;
	}
	trace!("wrote header with {} entries", table.len());
	Ok(header_size(table.len()) as u64)
}

pub fn read_table<R: Read>(reader: &mut R) -> Result<DecodedHeader, HuffError> {
	let count = match reader.read_u8() {
		Ok(count) => count as usize,
		Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
			return Err(HuffError::CorruptHeader("missing symbol count".to_string()));
		}
		Err(e) => return Err(e.into()),
	};

	if count == 0 {
		// A full table is written in ascending order, so its first entry is
		// symbol 0x00. An empty table's body opens with the end-of-stream bit
		// 1, so its first byte is never 0x00.
		let mut first = [0u8; 1];
		let got = read_up_to(reader, &mut first)?;
		if got == 0 || first[0] != 0x00 {
			trace!("count byte 0 without a 0x00 entry after it: empty table");
			return Ok(DecodedHeader { table: FrequencyTable::new(), overread: first[..got].to_vec() });
		}
		let mut entries = vec![0u8; FULL_TABLE_BYTES];
		let n = 1 + read_up_to(reader, &mut entries[1..])?;
		if n < FULL_TABLE_BYTES {
			return Err(HuffError::CorruptHeader(format!(
				"full table needs {} bytes but only {} follow", FULL_TABLE_BYTES, n
			)));
		}
		trace!("count byte 0 followed by symbol 0x00: full table");
		return Ok(DecodedHeader { table: parse_entries(&entries)?, overread: Vec::new() });
	}

	let mut entries = vec![0u8; count * ENTRY_SIZE];
	let n = read_up_to(reader, &mut entries)?;
	if n < entries.len() {
		return Err(HuffError::CorruptHeader(format!(
			"table declares {} symbols ({} bytes) but only {} bytes follow", count, entries.len(), n
		)));
	}
	Ok(DecodedHeader { table: parse_entries(&entries)?, overread: Vec::new() })
}

fn parse_entries(entries: &[u8]) -> Result<FrequencyTable, HuffError> {
	let mut table = FrequencyTable::new();
	for entry in entries.chunks_exact(ENTRY_SIZE) {
		let byte = entry[0];
		let weight = BigEndian::read_u24(&entry[1..]);
		if table.insert(byte, weight).is_some() {
			return Err(HuffError::CorruptHeader(format!("symbol 0x{:02x} listed twice", byte)));
		}
	}
	Ok(table)
}
