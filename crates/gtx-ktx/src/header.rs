//! KTX 1.1 file header.

use byteorder::{ByteOrder, LittleEndian};
use gtx_common::{swap_words, BinaryReader, BinaryWriter, ByteSwap, Endian};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result};

/// File identifier ("«KTX 11»\r\n\x1A\n").
pub const KTX_IDENTIFIER: [u8; 12] = [
    0xAB, b'K', b'T', b'X', b' ', b'1', b'1', 0xBB, b'\r', b'\n', 0x1A, b'\n',
];

/// Endianness marker as read in the writer's byte order.
pub const KTX_ENDIANNESS: u32 = 0x0403_0201;

/// KTX header fields following the identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct KtxHeader {
    pub endianness: u32,
    pub gl_type: u32,
    pub gl_type_size: u32,
    pub gl_format: u32,
    pub gl_internal_format: u32,
    pub gl_base_internal_format: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub pixel_depth: u32,
    pub number_of_array_elements: u32,
    pub number_of_faces: u32,
    pub number_of_mipmap_levels: u32,
    pub bytes_of_key_value_data: u32,
}

const _: () = assert!(std::mem::size_of::<KtxHeader>() == KtxHeader::SIZE);

impl ByteSwap for KtxHeader {
    #[inline]
    fn byte_swap(&mut self) {
        swap_words(self);
    }
}

impl KtxHeader {
    /// Size of the header fields.
    pub const SIZE: usize = 52;

    /// Offset of the key/value data.
    pub const FILE_HEADER_SIZE: usize = KTX_IDENTIFIER.len() + Self::SIZE;

    /// Read the identifier and header from the start of a file.
    ///
    /// Returns the header in host order and the byte order of the file.
    pub fn parse(data: &[u8]) -> Result<(Self, Endian)> {
        if data.len() < Self::FILE_HEADER_SIZE {
            return Err(Error::Truncated {
                what: "header",
                needed: Self::FILE_HEADER_SIZE,
                available: data.len(),
            });
        }
        if data[..KTX_IDENTIFIER.len()] != KTX_IDENTIFIER {
            return Err(Error::InvalidIdentifier);
        }

        let endian = match LittleEndian::read_u32(&data[12..16]) {
            KTX_ENDIANNESS => Endian::Little,
            marker if marker.swap_bytes() == KTX_ENDIANNESS => Endian::Big,
            marker => {
                return Err(Error::InvalidHeader(format!(
                    "endianness marker {marker:#010x}"
                )))
            }
        };

        let mut reader = BinaryReader::with_endian(data, endian);
        reader.advance(KTX_IDENTIFIER.len());
        let header: Self = reader.read_record()?;
        Ok((header, endian))
    }

    /// Write the identifier and header.
    pub fn encode(&self, writer: &mut BinaryWriter) {
        writer.write_bytes(&KTX_IDENTIFIER);
        writer.write_record(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KtxHeader {
        KtxHeader {
            endianness: KTX_ENDIANNESS,
            gl_type: 0x1401,
            gl_type_size: 1,
            gl_format: 0x1908,
            gl_internal_format: 0x8058,
            gl_base_internal_format: 0x1908,
            pixel_width: 16,
            pixel_height: 8,
            number_of_faces: 1,
            number_of_mipmap_levels: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_little_endian_layout() {
        let mut writer = BinaryWriter::new(Endian::Little);
        sample().encode(&mut writer);
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), KtxHeader::FILE_HEADER_SIZE);
        assert_eq!(&bytes[12..16], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&bytes[36..40], &[16, 0, 0, 0]);

        let (header, endian) = KtxHeader::parse(&bytes).unwrap();
        assert_eq!(endian, Endian::Little);
        assert_eq!(header, sample());
    }

    #[test]
    fn test_big_endian_file() {
        let mut writer = BinaryWriter::new(Endian::Big);
        sample().encode(&mut writer);
        let bytes = writer.into_inner();
        assert_eq!(&bytes[12..16], &[0x04, 0x03, 0x02, 0x01]);

        let (header, endian) = KtxHeader::parse(&bytes).unwrap();
        assert_eq!(endian, Endian::Big);
        assert_eq!(header.pixel_width, 16);
        assert_eq!(header.gl_internal_format, 0x8058);
    }

    #[test]
    fn test_rejects_identifier() {
        let mut bytes = vec![0u8; KtxHeader::FILE_HEADER_SIZE];
        bytes[..4].copy_from_slice(b"DDS ");
        assert!(matches!(KtxHeader::parse(&bytes), Err(Error::InvalidIdentifier)));
    }

    #[test]
    fn test_rejects_short_file() {
        assert!(matches!(
            KtxHeader::parse(&KTX_IDENTIFIER),
            Err(Error::Truncated {
                what: "header",
                needed: 64,
                available: 12
            })
        ));
    }

    #[test]
    fn test_rejects_endianness_marker() {
        let mut header = sample();
        header.endianness = 0x1234_5678;
        let mut writer = BinaryWriter::new(Endian::Little);
        header.encode(&mut writer);
        assert!(matches!(
            KtxHeader::parse(writer.as_slice()),
            Err(Error::InvalidHeader(_))
        ));
    }
}
