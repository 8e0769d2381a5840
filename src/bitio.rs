//! Bit-level I/O over byte streams.
//!
//! Bits are packed most-significant-bit first: the first bit written to a byte
//! lands in bit 7. Both sides move data to and from the underlying stream in
//! fixed-size chunks.

use crate::config::DEFAULT_BUFFER_SIZE;
use std::io::{self, ErrorKind, Read, Write};

/// Reads until `buf` is full or the reader reports end of stream.
///
/// Returns the number of bytes placed in `buf`; anything short of `buf.len()`
/// means the stream is exhausted.
pub fn read_up_to<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

pub struct BitWriter<W: Write> {
    inner: W,
    buffer: Vec<u8>,
    chunk_size: usize,
    current: u8,
    filled: u8,
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_capacity(inner, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_capacity(inner: W, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            inner,
            buffer: Vec::with_capacity(chunk_size),
            chunk_size,
            current: 0,
            filled: 0,
            bytes_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.current |= 1 << (7 - self.filled);
        }
        self.filled += 1;
        if self.filled == 8 {
            self.push_byte();
            if self.buffer.len() == self.chunk_size {
                self.write_buffer()?;
            }
        }
        Ok(())
    }

    pub fn write_bits<I: IntoIterator<Item = bool>>(&mut self, bits: I) -> io::Result<()> {
        for bit in bits {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Pads any partial byte with zero bits and pushes everything buffered
    /// through to the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.filled > 0 {
            self.push_byte();
        }
        self.write_buffer()?;
        self.inner.flush()
    }

    /// Bytes handed to the underlying writer so far, padding included.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn push_byte(&mut self) {
        self.buffer.push(self.current);
        self.current = 0;
        self.filled = 0;
    }

    fn write_buffer(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            self.inner.write_all(&self.buffer)?;
            self.bytes_written += self.buffer.len() as u64;
            self.buffer.clear();
        }
        Ok(())
    }
}

pub struct BitReader<R: Read> {
    inner: R,
    buffer: Vec<u8>,
    len: usize,
    pos: usize,
    bit: u8,
    exhausted: bool,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_capacity(inner: R, chunk_size: usize) -> Self {
        Self {
            inner,
            buffer: vec![0; chunk_size.max(1)],
            len: 0,
            pos: 0,
            bit: 0,
            exhausted: false,
        }
    }

    /// Returns the next bit, or `None` once the underlying stream has no more
    /// bytes. A `None` is never a zero bit.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.pos == self.len && !self.fill()? {
            return Ok(None);
        }
        let byte = self.buffer[self.pos];
        let bit = (byte >> (7 - self.bit)) & 1 == 1;
        self.bit += 1;
        if self.bit == 8 {
            self.bit = 0;
            self.pos += 1;
        }
        Ok(Some(bit))
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> io::Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        self.len = read_up_to(&mut self.inner, &mut self.buffer)?;
        self.pos = 0;
        self.bit = 0;
        if self.len < self.buffer.len() {
            self.exhausted = true;
        }
        Ok(self.len > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_msb_first_packing() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits([true, false, true, false, false, false, false, true]).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), vec![0b1010_0001]);
    }

    #[test]
    fn test_partial_byte_is_zero_padded() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits([true, true, true]).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.bytes_written(), 1);
        assert_eq!(writer.into_inner(), vec![0b1110_0000]);
    }

    #[test]
    fn test_flush_twice_adds_nothing() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bit(true).unwrap();
        writer.flush().unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), vec![0x80]);
    }

    #[test]
    fn test_full_chunks_reach_inner_before_flush() {
        let mut writer = BitWriter::with_capacity(Vec::new(), 2);
        for _ in 0..24 {
            writer.write_bit(true).unwrap();
        }
        // two bytes form a full chunk, the third is still buffered
        assert_eq!(writer.get_ref().len(), 2);
        writer.flush().unwrap();
        assert_eq!(writer.get_ref().len(), 3);
    }

    #[test]
    fn test_reader_yields_bits_then_none() {
        let mut reader = BitReader::new(Cursor::new(vec![0b1000_0001]));
        let mut bits = Vec::new();
        while let Some(bit) = reader.read_bit().unwrap() {
            bits.push(bit);
        }
        assert_eq!(bits, vec![true, false, false, false, false, false, false, true]);
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn test_reader_empty_stream() {
        let mut reader = BitReader::new(Cursor::new(Vec::<u8>::new()));
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn test_reader_crosses_chunk_boundaries() {
        let data: Vec<u8> = (0..=255u8).collect();
        let mut reader = BitReader::with_capacity(Cursor::new(data.clone()), 3);
        let mut writer = BitWriter::with_capacity(Vec::new(), 5);
        while let Some(bit) = reader.read_bit().unwrap() {
            writer.write_bit(bit).unwrap();
        }
        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), data);
    }

    #[test]
    fn test_read_up_to_short_stream() {
        let mut buf = [0u8; 8];
        let n = read_up_to(&mut Cursor::new(vec![1, 2, 3]), &mut buf).unwrap();
        assert_eq!(n, 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
    }
}
