//! Archive file header.

use gtx_common::{swap_words, BinaryReader, BinaryWriter, ByteSwap};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result};

/// File magic ("Gfx2").
pub const GFD_MAGIC: u32 = 0x4766_7832;

/// GPU version tag for GPU7.
pub const GPU_VERSION_GPU7: u32 = 2;

/// Data alignment policy of an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignMode {
    /// Not known yet. Archives in this mode cannot be saved.
    Undefined,
    /// Payloads are written back to back.
    Disabled,
    /// Image and mip payloads are padded to the surface alignment.
    Enabled,
}

impl AlignMode {
    /// Decode the on-disk value. Unknown values map to `Undefined`.
    pub fn from_raw(value: u32) -> Self {
        match value {
            0 => Self::Disabled,
            1 => Self::Enabled,
            _ => Self::Undefined,
        }
    }

    /// The on-disk value.
    pub fn to_raw(self) -> u32 {
        match self {
            Self::Disabled => 0,
            Self::Enabled => 1,
            Self::Undefined => 2,
        }
    }
}

/// On-disk header record (0x20 bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct RawHeader {
    pub magic: u32,
    pub size: u32,
    pub major_version: u32,
    pub minor_version: u32,
    pub gpu_version: u32,
    pub align_mode: u32,
    pub reserved: [u32; 2],
}

const _: () = assert!(std::mem::size_of::<RawHeader>() == GfdHeader::SIZE);

impl ByteSwap for RawHeader {
    #[inline]
    fn byte_swap(&mut self) {
        swap_words(self);
    }
}

/// Archive header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GfdHeader {
    pub major_version: u32,
    pub minor_version: u32,
    pub gpu_version: u32,
    pub align_mode: AlignMode,
}

impl Default for GfdHeader {
    fn default() -> Self {
        Self {
            major_version: 7,
            minor_version: 1,
            gpu_version: GPU_VERSION_GPU7,
            align_mode: AlignMode::Enabled,
        }
    }
}

impl GfdHeader {
    /// Serialized header size.
    pub const SIZE: usize = 0x20;

    /// Check if this is a 6.0 archive, whose alignment mode is inferred
    /// from the presence of pad blocks.
    #[inline]
    pub fn is_legacy(&self) -> bool {
        self.major_version == 6 && self.minor_version == 0
    }

    /// Check if texture registers use the 7.x layout.
    #[inline]
    pub fn is_v7(&self) -> bool {
        self.major_version == 7
    }

    /// Verify a raw header record.
    pub fn verify(raw: &RawHeader) -> Result<()> {
        if raw.magic != GFD_MAGIC {
            return Err(Error::MagicMismatch {
                what: "file header",
                expected: GFD_MAGIC,
                actual: raw.magic,
            });
        }
        if raw.size as usize != Self::SIZE {
            return Err(Error::SizeMismatch {
                what: "file header",
                expected: Self::SIZE,
                actual: raw.size as usize,
            });
        }
        if raw.major_version != 6 && raw.major_version != 7 {
            return Err(Error::VersionUnsupported {
                what: "file",
                major: raw.major_version,
                minor: raw.minor_version,
            });
        }
        if raw.gpu_version != GPU_VERSION_GPU7 {
            return Err(Error::GpuVersion(raw.gpu_version));
        }
        Ok(())
    }

    /// Convert a raw record without verification.
    pub fn from_raw(raw: &RawHeader) -> Self {
        Self {
            major_version: raw.major_version,
            minor_version: raw.minor_version,
            gpu_version: raw.gpu_version,
            align_mode: AlignMode::from_raw(raw.align_mode),
        }
    }

    /// Convert into a raw record.
    pub fn to_raw(&self) -> RawHeader {
        RawHeader {
            magic: GFD_MAGIC,
            size: Self::SIZE as u32,
            major_version: self.major_version,
            minor_version: self.minor_version,
            gpu_version: self.gpu_version,
            align_mode: self.align_mode.to_raw(),
            reserved: [0; 2],
        }
    }

    /// Read and verify a header. A 6.0 header always decodes with an
    /// undefined alignment mode.
    pub fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let raw: RawHeader = reader.read_record()?;
        Self::verify(&raw)?;
        let mut header = Self::from_raw(&raw);
        if header.is_legacy() {
            header.align_mode = AlignMode::Undefined;
        }
        Ok(header)
    }

    /// Read a header without verification.
    pub fn decode_unverified(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let raw: RawHeader = reader.read_record()?;
        Ok(Self::from_raw(&raw))
    }

    /// Verify and write the header.
    pub fn encode(&self, writer: &mut BinaryWriter) -> Result<()> {
        let raw = self.to_raw();
        Self::verify(&raw)?;
        writer.write_record(&raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtx_common::Endian;

    fn encode_raw(raw: &RawHeader) -> Vec<u8> {
        let mut writer = BinaryWriter::new(Endian::Big);
        writer.write_record(raw);
        writer.into_inner()
    }

    #[test]
    fn test_default_header_bytes() {
        let mut writer = BinaryWriter::new(Endian::Big);
        GfdHeader::default().encode(&mut writer).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), GfdHeader::SIZE);
        assert_eq!(&bytes[..4], b"Gfx2");
        assert_eq!(&bytes[8..12], &[0, 0, 0, 7]);
        assert_eq!(&bytes[20..24], &[0, 0, 0, 1]);
    }

    #[test]
    fn test_legacy_forces_undefined() {
        let header = GfdHeader {
            major_version: 6,
            minor_version: 0,
            ..Default::default()
        };
        let bytes = encode_raw(&header.to_raw());
        let mut reader = BinaryReader::with_endian(&bytes, Endian::Big);
        let decoded = GfdHeader::decode(&mut reader).unwrap();
        assert_eq!(decoded.align_mode, AlignMode::Undefined);

        let mut reader = BinaryReader::with_endian(&bytes, Endian::Big);
        let raw = GfdHeader::decode_unverified(&mut reader).unwrap();
        assert_eq!(raw.align_mode, AlignMode::Enabled);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut raw = GfdHeader::default().to_raw();
        raw.magic = 0x1234_5678;
        let bytes = encode_raw(&raw);
        let mut reader = BinaryReader::with_endian(&bytes, Endian::Big);
        assert!(matches!(
            GfdHeader::decode(&mut reader),
            Err(Error::MagicMismatch {
                actual: 0x1234_5678,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_version() {
        let mut raw = GfdHeader::default().to_raw();
        raw.major_version = 8;
        let bytes = encode_raw(&raw);
        let mut reader = BinaryReader::with_endian(&bytes, Endian::Big);
        assert!(matches!(
            GfdHeader::decode(&mut reader),
            Err(Error::VersionUnsupported { major: 8, .. })
        ));
    }

    #[test]
    fn test_unknown_align_mode() {
        assert_eq!(AlignMode::from_raw(5), AlignMode::Undefined);
        assert_eq!(AlignMode::from_raw(0), AlignMode::Disabled);
    }
}
