//! Cursor for decoding GFD records from a byte slice.
//!
//! [`BinaryReader`] never copies more than the value being read. Bulk data is
//! returned as subslices of the input, and fixed-layout records go through
//! zerocopy before their fields are brought into host order.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use zerocopy::FromBytes;

use crate::{ByteSwap, Endian, Error, Result};

/// A bounds-checked cursor over serialized archive data.
///
/// # Example
///
/// ```
/// use gtx_common::{BinaryReader, Endian};
///
/// let data = [0x47, 0x66, 0x78, 0x32, 0x00, 0x00, 0x00, 0x20];
/// let mut reader = BinaryReader::with_endian(&data, Endian::Big);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x47667832);
/// assert_eq!(reader.read_u32().unwrap(), 0x20);
/// assert!(reader.remaining_bytes().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
    endian: Endian,
}

impl<'a> BinaryReader<'a> {
    /// Create a reader positioned at the start of `data`.
    #[inline]
    pub const fn with_endian(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            position: 0,
            endian,
        }
    }

    #[inline]
    pub const fn endian(&self) -> Endian {
        self.endian
    }

    /// Absolute offset of the next byte to read.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Move to an absolute offset. Offsets past the end make every later
    /// read fail.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Skip `count` bytes without bounds checking.
    #[inline]
    pub fn advance(&mut self, count: usize) {
        self.position = self.position.saturating_add(count);
    }

    /// Everything from the cursor to the end of the input.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        self.data.get(self.position..).unwrap_or_default()
    }

    fn peek_slice(&self, count: usize) -> Result<&'a [u8]> {
        let available = self.remaining_bytes();
        available.get(..count).ok_or(Error::UnexpectedEof {
            needed: count,
            available: available.len(),
        })
    }

    /// Borrow the next `count` bytes and move past them.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_slice(count)?;
        self.position += count;
        Ok(bytes)
    }

    fn word(&self, bytes: &[u8]) -> u32 {
        match self.endian {
            Endian::Big => BigEndian::read_u32(bytes),
            Endian::Little => LittleEndian::read_u32(bytes),
        }
    }

    /// Read a 32-bit word in the reader's byte order.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(self.word(bytes))
    }

    /// Read the next word without moving the cursor.
    #[inline]
    pub fn peek_u32(&self) -> Result<u32> {
        let bytes = self.peek_slice(4)?;
        Ok(self.word(bytes))
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_u32().map(|word| word as i32)
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_u32().map(f32::from_bits)
    }

    /// Read a NUL-terminated UTF-8 string and move past the terminator.
    pub fn read_cstring(&mut self) -> Result<&'a str> {
        let rest = self.remaining_bytes();
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(Error::MissingNullTerminator)?;
        self.position += len + 1;
        Ok(std::str::from_utf8(&rest[..len])?)
    }

    /// Read a fixed-layout record and bring it into host byte order.
    ///
    /// The record is decoded into a fresh value; the input is never modified.
    pub fn read_record<T: FromBytes + ByteSwap>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        let mut record = T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })?;
        record.normalize(self.endian);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_order() {
        let data = [0x42, 0x4C, 0x4B, 0x7B];
        let mut big = BinaryReader::with_endian(&data, Endian::Big);
        let mut little = BinaryReader::with_endian(&data, Endian::Little);

        assert_eq!(big.read_u32().unwrap(), 0x424C4B7B);
        assert_eq!(little.read_u32().unwrap(), 0x7B4B4C42);
    }

    #[test]
    fn test_read_record_swaps_fields() {
        let data = [0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x01];
        let mut reader = BinaryReader::with_endian(&data, Endian::Big);

        let words: [u32; 2] = reader.read_record().unwrap();
        assert_eq!(words, [7, 1]);
        assert_eq!(reader.position(), 8);
    }

    #[test]
    fn test_read_cstring() {
        let data = b"aColor\0uMvp\0";
        let mut reader = BinaryReader::with_endian(data, Endian::Big);

        assert_eq!(reader.read_cstring().unwrap(), "aColor");
        assert_eq!(reader.read_cstring().unwrap(), "uMvp");
        assert!(matches!(
            reader.read_cstring(),
            Err(Error::MissingNullTerminator)
        ));
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0x00, 0x00, 0x00, 0x01];
        let mut reader = BinaryReader::with_endian(&data, Endian::Big);

        assert_eq!(reader.peek_u32().unwrap(), 1);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_i32().unwrap(), 1);
    }

    #[test]
    fn test_seek_past_end() {
        let data = [0u8; 4];
        let mut reader = BinaryReader::with_endian(&data, Endian::Big);
        reader.seek(16);

        assert!(reader.remaining_bytes().is_empty());
        assert!(matches!(
            reader.read_u32(),
            Err(Error::UnexpectedEof {
                needed: 4,
                available: 0
            })
        ));
    }

    #[test]
    fn test_truncated_word() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::with_endian(&data, Endian::Little);

        assert!(matches!(
            reader.read_u32(),
            Err(Error::UnexpectedEof {
                needed: 4,
                available: 2
            })
        ));
    }
}
