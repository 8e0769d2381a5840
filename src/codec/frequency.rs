//! Byte statistics and their fixed-point probability table.

use crate::bitio::read_up_to;
use std::collections::BTreeMap;
use std::io::{self, Read};

/// Fixed-point scale of a probability: 10^7, i.e. seven decimal digits.
pub const PROBABILITY_SCALE: u64 = 10_000_000;

/// Scales `count / total` by [`PROBABILITY_SCALE`], rounding half up.
///
/// Computed as `floor((2 * count * SCALE + total) / (2 * total))` in u128, which
/// is exact for any u64 inputs and never fails on non-terminating quotients.
pub fn scale_probability(count: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let numerator = 2 * count as u128 * PROBABILITY_SCALE as u128 + total as u128;
    let scaled = numerator / (2 * total as u128);
    scaled as u32
}

/// Occurrence counts for every byte value in a stream.
#[derive(Debug, Clone)]
pub struct ByteCounts {
    counts: [u64; 256],
    total: u64,
}

impl Default for ByteCounts {
    fn default() -> Self {
        Self { counts: [0; 256], total: 0 }
    }
}

impl ByteCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = Self::new();
        counts.update(data);
        counts
    }

    /// Scans `reader` to the end in `chunk_size` pieces.
    pub fn from_reader<R: Read + ?Sized>(reader: &mut R, chunk_size: usize) -> io::Result<Self> {
        let mut counts = Self::new();
        let mut buffer = vec![0u8; chunk_size.max(1)];
        loop {
            let n = read_up_to(reader, &mut buffer)?;
            if n == 0 {
                break;
            }
            counts.update(&buffer[..n]);
        }
        Ok(counts)
    }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
        self.total += data.len() as u64;
    }

    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn to_probabilities(&self) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        for (byte, &count) in self.counts.iter().enumerate() {
            if count > 0 {
                table.insert(byte as u8, scale_probability(count, self.total));
            }
        }
        table
    }
}

/// Scaled probability per distinct byte value, iterated in ascending byte order.
///
/// This is the only state shared between the two ends of a stream: the tree
/// is rebuilt from it on both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: BTreeMap<u8, u32>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous weight if `byte` was already present.
    pub fn insert(&mut self, byte: u8, weight: u32) -> Option<u32> {
        self.entries.insert(byte, weight)
    }

    pub fn get(&self, byte: u8) -> Option<u32> {
        self.entries.get(&byte).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.entries.iter().map(|(&byte, &weight)| (byte, weight))
    }
}

impl FromIterator<(u8, u32)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (u8, u32)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}
