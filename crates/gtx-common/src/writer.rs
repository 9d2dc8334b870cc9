//! Binary writer for building byte buffers.

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use zerocopy::{Immutable, IntoBytes};

use crate::{ByteSwap, Endian, Result};

/// A growable output buffer that writes multi-byte values in a fixed byte order.
///
/// # Example
///
/// ```
/// use gtx_common::{BinaryWriter, Endian};
///
/// let mut writer = BinaryWriter::new(Endian::Big);
/// writer.write_u32(0x424C4B7B).unwrap();
/// writer.write_zeros(4);
///
/// assert_eq!(writer.into_inner(), [0x42, 0x4C, 0x4B, 0x7B, 0, 0, 0, 0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
    endian: Endian,
}

impl BinaryWriter {
    /// Create an empty writer.
    pub fn new(endian: Endian) -> Self {
        Self {
            buffer: Vec::new(),
            endian,
        }
    }

    /// Create an empty writer with reserved capacity.
    pub fn with_capacity(endian: Endian, capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            endian,
        }
    }

    /// Get the byte order used for multi-byte writes.
    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    /// Get the bytes written so far.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer and return its buffer.
    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Write a u16 in the writer's byte order.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        match self.endian {
            Endian::Big => self.buffer.write_u16::<BigEndian>(value)?,
            Endian::Little => self.buffer.write_u16::<LittleEndian>(value)?,
        }
        Ok(())
    }

    /// Write a u32 in the writer's byte order.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        match self.endian {
            Endian::Big => self.buffer.write_u32::<BigEndian>(value)?,
            Endian::Little => self.buffer.write_u32::<LittleEndian>(value)?,
        }
        Ok(())
    }

    /// Append raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Append `count` zero bytes.
    #[inline]
    pub fn write_zeros(&mut self, count: usize) {
        self.buffer.resize(self.buffer.len() + count, 0);
    }

    /// Write a fixed-layout record converted from host to the writer's byte order.
    ///
    /// The record is copied before swapping, so `record` itself is left untouched.
    pub fn write_record<T: IntoBytes + Immutable + ByteSwap + Clone>(&mut self, record: &T) {
        let mut copy = record.clone();
        copy.normalize(self.endian);
        self.buffer.extend_from_slice(copy.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryReader;

    #[test]
    fn test_write_little_endian() {
        let mut writer = BinaryWriter::new(Endian::Little);
        writer.write_u32(0x04030201).unwrap();
        writer.write_u16(0x0605).unwrap();
        assert_eq!(writer.as_slice(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_record_read_back() {
        let record = [0x47667832u32, 0x20, 7, 1];
        let mut writer = BinaryWriter::new(Endian::Big);
        writer.write_record(&record);
        assert_eq!(&writer.as_slice()[..4], b"Gfx2");

        let bytes = writer.into_inner();
        let mut reader = BinaryReader::with_endian(&bytes, Endian::Big);
        let decoded: [u32; 4] = reader.read_record().unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_write_zeros() {
        let mut writer = BinaryWriter::new(Endian::Big);
        writer.write_bytes(&[1]);
        writer.write_zeros(3);
        assert_eq!(writer.position(), 4);
        assert_eq!(writer.into_inner(), [1, 0, 0, 0]);
    }
}
