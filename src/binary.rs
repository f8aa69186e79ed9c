//! Binary reading utilities for the dungeon archive index.
//!
//! This module provides functions for reading little-endian integers,
//! byte slices, and fixed-width ASCII name slots from byte buffers. All
//! functions perform bounds checking and return
//! [`ExtractError::UnexpectedEof`] for truncated data.
//!
//! # Example
//!
//! ```
//! use dungeon_extract::binary::{read_ascii_slot, read_u32_le};
//!
//! let data = [0x02, 0x00, 0x00, 0x00, b'A', b'1', 0x00, 0x00];
//!
//! assert_eq!(read_u32_le(&data, 0).unwrap(), 2);
//! assert_eq!(read_ascii_slot(&data, 4, 4).unwrap(), Some("A1".to_string()));
//! ```

use crate::error::{ExtractError, Result};

/// Returns `offset + len`, or an `UnexpectedEof` error if that range does
/// not fit inside a buffer of `available` bytes.
fn checked_end(offset: usize, len: usize, available: usize) -> Result<usize> {
    match offset.checked_add(len) {
        Some(end) if end <= available => Ok(end),
        Some(end) => Err(ExtractError::unexpected_eof(end, available)),
        None => Err(ExtractError::unexpected_eof(usize::MAX, available)),
    }
}

/// Reads a little-endian u32 value from the byte buffer at the given offset.
///
/// # Errors
///
/// Returns `ExtractError::UnexpectedEof` if the buffer doesn't contain
/// at least 4 bytes starting from the given offset.
///
/// # Example
///
/// ```
/// use dungeon_extract::binary::read_u32_le;
///
/// let data = [0x78, 0x56, 0x34, 0x12];
/// assert_eq!(read_u32_le(&data, 0).unwrap(), 0x12345678);
/// ```
pub fn read_u32_le(bytes: &[u8], offset: usize) -> Result<u32> {
    let end = checked_end(offset, 4, bytes.len())?;
    let slice = &bytes[offset..end];
    Ok(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Reads a slice of bytes from the buffer at the given offset.
///
/// # Errors
///
/// Returns `ExtractError::UnexpectedEof` if the buffer doesn't contain
/// at least `len` bytes starting from the given offset.
pub fn read_bytes(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = checked_end(offset, len, bytes.len())?;
    Ok(&bytes[offset..end])
}

/// Reads a fixed-width, NUL-padded ASCII slot.
///
/// The slot is cut at its first NUL byte. Returns `Ok(None)` when the cut
/// slot contains a non-ASCII byte; the caller decides how to report it.
///
/// # Errors
///
/// Returns `ExtractError::UnexpectedEof` if `offset + len` is beyond the buffer.
pub fn read_ascii_slot(bytes: &[u8], offset: usize, len: usize) -> Result<Option<String>> {
    let slice = read_bytes(bytes, offset, len)?;
    let string_len = slice.iter().position(|&b| b == 0).unwrap_or(len);
    let name = &slice[..string_len];

    if !name.is_ascii() {
        return Ok(None);
    }
    Ok(Some(name.iter().map(|&b| char::from(b)).collect()))
}
