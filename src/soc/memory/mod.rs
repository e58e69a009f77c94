//! Single-Port RAM.
//!
//! This module implements the addressable memory model shared by every
//! requester. It provides:
//! 1. **SinglePortRam:** word-backed storage with byte addressing.
//! 2. **Controller:** read latency models for the Avalon port.
//! 3. **Ports:** the Wishbone and Avalon slave front-ends wrapping the RAM.

/// Avalon-MM slave port with variable read latency.
pub mod avalon;

/// Read latency models.
pub mod controller;

/// Wishbone slave port with edge-generated acknowledgment.
pub mod wishbone;

use crate::common::data::AccessType;
use crate::common::error::{SimError, SimResult};
use crate::config::{MemoryConfig, SUPPORTED_WIDTHS};

/// Width of the minimum addressable unit, in bits.
pub const SYMBOL_BITS: u32 = 8;

/// Word-backed memory with byte addressing.
///
/// Each word occupies `body = width / 8` consecutive bytes of the backing
/// store, little-endian. The low `log2(body)` bits of an address select a
/// byte within the word; accesses always move whole words, so a nonzero byte
/// offset is either rejected (strict alignment) or ignored (`skip_align`).
#[derive(Clone, Debug)]
pub struct SinglePortRam {
    /// Backing bytes, `depth * body` long.
    bytes: Vec<u8>,
    depth: usize,
    width: u32,
    body: usize,
    shift: u32,
    init: u64,
    skip_align: bool,
}

impl SinglePortRam {
    /// Creates a RAM and fills it with `init`.
    ///
    /// # Arguments
    ///
    /// * `depth` - Number of words.
    /// * `width` - Bits per word, one of 8, 16, 32, 64.
    /// * `symbol` - Bits per addressable unit, must be 8.
    /// * `init` - Reset fill value, truncated to `width` bits.
    /// * `skip_align` - Ignore nonzero byte offsets instead of faulting.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` for an unsupported width or symbol, or a zero depth.
    pub fn new(depth: usize, width: u32, symbol: u32, init: u64, skip_align: bool) -> SimResult<Self> {
        if !SUPPORTED_WIDTHS.contains(&width) {
            return Err(SimError::ConfigurationError(format!(
                "unsupported word width {} bits",
                width
            )));
        }
        if symbol != SYMBOL_BITS {
            return Err(SimError::ConfigurationError(format!(
                "unsupported symbol size {} bits",
                symbol
            )));
        }
        if depth == 0 {
            return Err(SimError::ConfigurationError("memory depth is zero".to_string()));
        }

        let body = (width / symbol) as usize;
        let len = storage_len(depth, body)?;
        let mut ram = Self {
            bytes: vec![0; len],
            depth,
            width,
            body,
            shift: body.trailing_zeros(),
            init,
            skip_align,
        };
        ram.reset();
        Ok(ram)
    }

    /// Creates a RAM from the `[memory]` configuration section.
    pub fn from_config(config: &MemoryConfig) -> SimResult<Self> {
        Self::new(
            config.depth,
            config.width,
            config.symbol,
            config.init_val()?,
            config.skip_align,
        )
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Bytes per word.
    pub fn body(&self) -> usize {
        self.body
    }

    pub fn skip_align(&self) -> bool {
        self.skip_align
    }

    /// Mask selecting the low `width` bits of a value.
    pub fn mask(&self) -> u64 {
        if self.width == 64 {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        }
    }

    /// Fills every word with the configured initial value.
    pub fn reset(&mut self) {
        let init = self.init & self.mask();
        for index in 0..self.depth {
            self.store_word(index, init);
        }
    }

    /// Splits `address` into `(word_index, byte_offset)` and validates both.
    ///
    /// # Errors
    ///
    /// * `AddressingFault` if the word index is not below `depth`.
    /// * `AlignmentFault` if the byte offset is nonzero and `skip_align` is off.
    pub fn decode(&self, op: AccessType, address: u64) -> SimResult<(usize, u64)> {
        let index = address >> self.shift;
        let offset = address & ((1u64 << self.shift) - 1);

        if index >= self.depth as u64 {
            return Err(SimError::AddressingFault {
                op,
                address,
                index,
                depth: self.depth,
            });
        }
        if offset != 0 && !self.skip_align {
            return Err(SimError::AlignmentFault {
                op,
                address,
                offset,
            });
        }
        Ok((index as usize, offset))
    }

    /// Reads the whole word containing `address`.
    pub fn read(&self, address: u64) -> SimResult<u64> {
        let (index, _) = self.decode(AccessType::Read, address)?;
        Ok(self.load_word(index))
    }

    /// Replaces the whole word containing `address` with `value`.
    pub fn write(&mut self, address: u64, value: u64) -> SimResult<()> {
        let (index, _) = self.decode(AccessType::Write, address)?;
        self.store_word(index, value);
        Ok(())
    }

    /// Copies a little-endian byte stream into consecutive words.
    ///
    /// The stream starts at word `word_offset`; a trailing partial word is
    /// zero-padded. Returns the number of words written.
    ///
    /// # Errors
    ///
    /// `AddressingFault` if the stream does not fit below `depth`.
    pub fn load(&mut self, data: &[u8], word_offset: usize) -> SimResult<usize> {
        let words = data.len().div_ceil(self.body);
        let fits = word_offset
            .checked_add(words)
            .is_some_and(|end| end <= self.depth);
        if !fits {
            let last = word_offset.saturating_add(words).saturating_sub(1) as u64;
            return Err(SimError::AddressingFault {
                op: AccessType::Write,
                address: last.wrapping_shl(self.shift),
                index: last,
                depth: self.depth,
            });
        }

        let start = word_offset * self.body;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        let padded = words * self.body;
        self.bytes[start + data.len()..start + padded].fill(0);
        Ok(words)
    }

    /// Assembles the word at `index` from its little-endian symbols.
    pub(crate) fn load_word(&self, index: usize) -> u64 {
        let start = index * self.body;
        let mut raw = [0u8; 8];
        raw[..self.body].copy_from_slice(&self.bytes[start..start + self.body]);
        u64::from_le_bytes(raw)
    }

    /// Packs `value` into the `body` symbols at `index`, dropping high bits.
    pub(crate) fn store_word(&mut self, index: usize, value: u64) {
        let start = index * self.body;
        let raw = value.to_le_bytes();
        self.bytes[start..start + self.body].copy_from_slice(&raw[..self.body]);
    }

    /// Returns the word at `index`, or `None` past the end.
    ///
    /// Backdoor access for harnesses; it bypasses address decoding.
    pub fn peek(&self, index: usize) -> Option<u64> {
        (index < self.depth).then(|| self.load_word(index))
    }
}

/// Size in bytes of the backing store for `depth` words of `body` bytes.
///
/// # Errors
///
/// `ConfigurationError` if the store cannot be addressed on this host.
pub(crate) fn storage_len(depth: usize, body: usize) -> SimResult<usize> {
    depth
        .checked_mul(body)
        .filter(|&len| len <= isize::MAX as usize)
        .ok_or_else(|| {
            SimError::ConfigurationError(format!(
                "depth {} x {} bytes per word overflows the address space",
                depth, body
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_splits_by_body() {
        let ram = SinglePortRam::new(16, 32, 8, 0, true).unwrap();
        assert_eq!(ram.decode(AccessType::Read, 0x0d).unwrap(), (3, 1));

        let ram = SinglePortRam::new(16, 8, 8, 0, true).unwrap();
        assert_eq!(ram.decode(AccessType::Read, 0x0d).unwrap(), (13, 0));
    }

    #[test]
    fn store_truncates_to_width() {
        let mut ram = SinglePortRam::new(4, 16, 8, 0, true).unwrap();
        ram.store_word(1, 0x1234_5678);
        assert_eq!(ram.load_word(1), 0x5678);
        assert_eq!(ram.load_word(0), 0);
        assert_eq!(ram.load_word(2), 0);
    }
}
