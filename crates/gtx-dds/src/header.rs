//! Legacy DDS file header.

use gtx_common::{swap_words, BinaryReader, ByteSwap, Endian};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result, DDS_MAGIC};

/// Pixel format flags.
pub mod pixel_flags {
    /// The alpha mask is valid.
    pub const ALPHA_PIXELS: u32 = 0x1;
    /// Alpha-only data.
    pub const ALPHA: u32 = 0x2;
    /// The four-character code is valid.
    pub const FOUR_CC: u32 = 0x4;
    /// The color masks are valid.
    pub const RGB: u32 = 0x40;
    /// YUV color data.
    pub const YUV: u32 = 0x200;
    /// Single-channel luminance data.
    pub const LUMINANCE: u32 = 0x20000;
}

/// `caps2` flags.
pub mod caps2 {
    pub const CUBEMAP: u32 = 0x200;
    pub const CUBEMAP_POSITIVE_X: u32 = 0x400;
    pub const CUBEMAP_NEGATIVE_X: u32 = 0x800;
    pub const CUBEMAP_POSITIVE_Y: u32 = 0x1000;
    pub const CUBEMAP_NEGATIVE_Y: u32 = 0x2000;
    pub const CUBEMAP_POSITIVE_Z: u32 = 0x4000;
    pub const CUBEMAP_NEGATIVE_Z: u32 = 0x8000;
    pub const VOLUME: u32 = 0x20_0000;

    /// Any of the cube map flags.
    pub const CUBEMAP_ANY: u32 = CUBEMAP
        | CUBEMAP_POSITIVE_X
        | CUBEMAP_NEGATIVE_X
        | CUBEMAP_POSITIVE_Y
        | CUBEMAP_NEGATIVE_Y
        | CUBEMAP_POSITIVE_Z
        | CUBEMAP_NEGATIVE_Z;
}

/// DDS file header (after the magic).
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct DdsHeader {
    /// Must be 124.
    pub size: u32,
    pub flags: u32,
    pub height: u32,
    pub width: u32,
    pub pitch_or_linear_size: u32,
    /// Layer count of a volume texture.
    pub depth: u32,
    pub mipmap_count: u32,
    pub reserved1: [u32; 11],
    pub pixel_format: DdsPixelFormat,
    pub caps: u32,
    pub caps2: u32,
    pub caps3: u32,
    pub caps4: u32,
    pub reserved2: u32,
}

const _: () = assert!(std::mem::size_of::<DdsHeader>() == DdsHeader::SIZE as usize);

impl ByteSwap for DdsHeader {
    fn byte_swap(&mut self) {
        swap_words(self);
        // the four-character code is a byte string
        self.pixel_format.four_cc.0.reverse();
    }
}

impl DdsHeader {
    /// Size of the header record after the magic.
    pub const SIZE: u32 = 124;

    /// Offset of the first level's data in a file without a DX10 header.
    pub const DATA_OFFSET: usize = 4 + Self::SIZE as usize;

    /// Read the magic and header from the start of a file.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::with_endian(data, Endian::Little);
        let magic = reader.read_bytes(4)?;
        if magic != DDS_MAGIC {
            let mut actual = [0; 4];
            actual.copy_from_slice(magic);
            return Err(Error::InvalidMagic(actual));
        }

        let header: Self = reader.read_record()?;
        if header.size != Self::SIZE {
            return Err(Error::InvalidHeader(format!(
                "header size is {}, expected {}",
                header.size,
                Self::SIZE
            )));
        }
        if header.pixel_format.size != DdsPixelFormat::SIZE {
            return Err(Error::InvalidHeader(format!(
                "pixel format size is {}, expected {}",
                header.pixel_format.size,
                DdsPixelFormat::SIZE
            )));
        }
        Ok(header)
    }

    /// Check if a DX10 extension header follows.
    pub fn is_dx10(&self) -> bool {
        self.pixel_format.has_flags(pixel_flags::FOUR_CC) && self.pixel_format.four_cc == FourCC::DX10
    }

    /// Check if the file holds a volume texture.
    pub fn is_volume(&self) -> bool {
        self.depth > 1 || self.caps2 & caps2::VOLUME != 0
    }

    /// Check if the file holds a cube map or any cube face.
    pub fn is_cubemap(&self) -> bool {
        self.caps2 & caps2::CUBEMAP_ANY != 0
    }
}

/// Pixel format block embedded in the header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct DdsPixelFormat {
    /// Must be 32.
    pub size: u32,
    pub flags: u32,
    /// Block compression tag, valid when `FOUR_CC` is set.
    pub four_cc: FourCC,
    /// Bits per pixel of uncompressed data.
    pub rgb_bit_count: u32,
    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected structure size.
    pub const SIZE: u32 = 32;

    /// Check if every flag in `flags` is set.
    #[inline]
    pub fn has_flags(&self, flags: u32) -> bool {
        self.flags & flags == flags
    }
}

/// Four-character code naming a block-compressed format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const DXT1: Self = Self(*b"DXT1");
    pub const DXT2: Self = Self(*b"DXT2");
    pub const DXT3: Self = Self(*b"DXT3");
    pub const DXT4: Self = Self(*b"DXT4");
    pub const DXT5: Self = Self(*b"DXT5");
    pub const ATI1: Self = Self(*b"ATI1");
    pub const ATI2: Self = Self(*b"ATI2");
    pub const BC4U: Self = Self(*b"BC4U");
    pub const BC4S: Self = Self(*b"BC4S");
    pub const BC5U: Self = Self(*b"BC5U");
    pub const BC5S: Self = Self(*b"BC5S");
    /// Marks a DX10 extension header.
    pub const DX10: Self = Self(*b"DX10");
}

impl std::fmt::Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_cc_display() {
        assert_eq!(FourCC::DXT5.to_string(), "DXT5");
        assert_eq!(FourCC([b'A', 0, b'B', 1]).to_string(), "A\\x00B\\x01");
    }

    #[test]
    fn test_rejects_bad_magic() {
        let data = [0u8; 128];
        assert!(matches!(DdsHeader::parse(&data), Err(Error::InvalidMagic([0, 0, 0, 0]))));
    }

    #[test]
    fn test_rejects_short_file() {
        assert!(matches!(DdsHeader::parse(b"DDS \x7c\0\0\0"), Err(Error::Common(_))));
    }
}
