//! Fixed-width primitive reads over an immutable byte buffer.
//!
//! Every read is bounds checked and little-endian. Nothing here keeps a cursor; the caller
//! always supplies the absolute offset.

use bytes::Bytes;

use crate::error::Error;

/// Byte width of a fixed-width unsigned integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UintWidth {
    /// 1 byte
    U8,
    /// 2 bytes
    U16,
    /// 4 bytes
    U32,
    /// 8 bytes
    U64,
}

impl UintWidth {
    /// The number of bytes occupied by an integer of this width.
    pub const fn bytes(self) -> usize {
        match self {
            UintWidth::U8 => 1,
            UintWidth::U16 => 2,
            UintWidth::U32 => 4,
            UintWidth::U64 => 8,
        }
    }

    /// The largest value representable at this width.
    pub const fn max_value(self) -> u64 {
        match self {
            UintWidth::U8 => u8::MAX as u64,
            UintWidth::U16 => u16::MAX as u64,
            UintWidth::U32 => u32::MAX as u64,
            UintWidth::U64 => u64::MAX,
        }
    }
}

/// Returns `buffer[offset..offset + len]`, or [`Error::OutOfBounds`].
fn slice(buffer: &[u8], offset: usize, len: usize) -> Result<&[u8], Error> {
    offset
        .checked_add(len)
        .and_then(|end| buffer.get(offset..end))
        .ok_or(Error::OutOfBounds { offset, len, buffer_len: buffer.len() })
}

/// Reads a little-endian unsigned integer of the given width at `offset`.
///
/// ```
/// use jobscope_decoder::codec::{read_fixed_uint, UintWidth};
///
/// let buffer = [0x01, 0x02, 0x00, 0x00];
/// assert_eq!(read_fixed_uint(&buffer, 0, UintWidth::U16).unwrap(), 0x0201);
/// assert!(read_fixed_uint(&buffer, 2, UintWidth::U32).is_err());
/// ```
pub fn read_fixed_uint(buffer: &[u8], offset: usize, width: UintWidth) -> Result<u64, Error> {
    let bytes = slice(buffer, offset, width.bytes())?;

    // widen into an 8 byte little-endian word; the high bytes stay zero
    let mut word = [0u8; 8];
    word[..bytes.len()].copy_from_slice(bytes);
    Ok(u64::from_le_bytes(word))
}

/// Copies `len` bytes at `offset` out of the buffer.
///
/// The result owns its bytes, so it never aliases memory the caller may later mutate.
pub fn read_blob(buffer: &[u8], offset: usize, len: usize) -> Result<Bytes, Error> {
    slice(buffer, offset, len).map(Bytes::copy_from_slice)
}
