//! Binary Image Loader.
//!
//! This module provides utilities for loading flat test images into the
//! memory model. An image is a raw little-endian byte stream, typically the
//! extracted text section of a linked program, laid into consecutive words
//! starting at word index 0.

use crate::common::error::{SimError, SimResult};
use crate::soc::memory::SinglePortRam;
use std::fs;

/// Loads a binary file from disk.
pub fn load_binary(path: &str) -> SimResult<Vec<u8>> {
    fs::read(path).map_err(|e| SimError::Io {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// Splits a byte stream into `body`-byte little-endian words.
///
/// A trailing partial word is zero-padded.
pub fn words_from_bytes(data: &[u8], body: usize) -> Vec<u64> {
    data.chunks(body)
        .map(|chunk| {
            let mut raw = [0u8; 8];
            raw[..chunk.len()].copy_from_slice(chunk);
            u64::from_le_bytes(raw)
        })
        .collect()
}

/// Lays `data` into `ram` from word 0 and returns the number of words written.
///
/// # Errors
///
/// `AddressingFault` if the image needs more words than the RAM has.
pub fn load_image(ram: &mut SinglePortRam, data: &[u8]) -> SimResult<usize> {
    let words = ram.load(data, 0)?;
    log::info!(
        "[Loader] Writing {} bytes ({} words of {} bits) @ word 0",
        data.len(),
        words,
        ram.width()
    );
    Ok(words)
}
