//! Variable-length integer encoding utilities.
//!
//! Posting lists store document identifiers as LEB128 varints: 7 bits per
//! byte with a continuation bit, so small deltas take a single byte.

use crate::error::{LexmatchError, Result};

/// Append the varint encoding of `value` to `out`, returning the bytes written.
pub fn write_u64(out: &mut Vec<u8>, value: u64) -> usize {
    let mut val = value;
    let mut written = 0;

    loop {
        let mut byte = (val & 0x7F) as u8;
        val >>= 7;

        if val != 0 {
            byte |= 0x80; // Set continuation bit
        }

        out.push(byte);
        written += 1;

        if val == 0 {
            return written;
        }
    }
}

/// Decode a u64 value from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed. Truncated or
/// overlong input is reported as a storage error: posting bytes come from
/// the backing store and a bad varint means the store is corrupt.
pub fn decode_u64(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut result = 0u64;
    let mut shift = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        // The tenth byte may only contribute the top bit of a u64.
        if shift == 63 && byte > 1 {
            return Err(LexmatchError::storage("VarInt overflow"));
        }

        result |= ((byte & 0x7F) as u64) << shift;

        if (byte & 0x80) == 0 {
            return Ok((result, i + 1));
        }

        shift += 7;
    }

    Err(LexmatchError::storage("Incomplete VarInt"))
}
