//! Block headers and block types.

use gtx_common::{swap_words, BinaryReader, BinaryWriter, ByteSwap};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result};

/// Block magic ("BLK{").
pub const BLOCK_MAGIC: u32 = 0x424C_4B7B;

const CODE_INVALID: u32 = 0;

/// Type of a block.
///
/// The first codes are shared by both block header versions. Texture and
/// geometry copy-program codes differ between version 0 and version 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    End,
    Pad,
    VertexShaderHeader,
    VertexShaderProgram,
    PixelShaderHeader,
    PixelShaderProgram,
    GeometryShaderHeader,
    GeometryShaderProgram,
    GeometryShaderCopyProgram,
    TextureHeader,
    TextureImageData,
    TextureMipData,
    /// A code with no meaning for this reader. Such blocks are skipped.
    Unknown(u32),
}

impl BlockType {
    /// Interpret a type code under the given block header major version.
    pub fn from_code(version: u32, code: u32) -> Self {
        match code {
            1 => return Self::End,
            2 => return Self::Pad,
            3 => return Self::VertexShaderHeader,
            5 => return Self::VertexShaderProgram,
            6 => return Self::PixelShaderHeader,
            7 => return Self::PixelShaderProgram,
            8 => return Self::GeometryShaderHeader,
            9 => return Self::GeometryShaderProgram,
            _ => {}
        }
        match (version, code) {
            (0, 10) => Self::TextureHeader,
            (0, 11) => Self::TextureImageData,
            (0, 12) => Self::TextureMipData,
            (0, 16) => Self::GeometryShaderCopyProgram,
            (1, 10) => Self::GeometryShaderCopyProgram,
            (1, 11) => Self::TextureHeader,
            (1, 12) => Self::TextureImageData,
            (1, 13) => Self::TextureMipData,
            _ => Self::Unknown(code),
        }
    }

    /// The type code under the given block header major version.
    pub fn code(self, version: u32) -> u32 {
        let v0 = version == 0;
        match self {
            Self::End => 1,
            Self::Pad => 2,
            Self::VertexShaderHeader => 3,
            Self::VertexShaderProgram => 5,
            Self::PixelShaderHeader => 6,
            Self::PixelShaderProgram => 7,
            Self::GeometryShaderHeader => 8,
            Self::GeometryShaderProgram => 9,
            Self::GeometryShaderCopyProgram if v0 => 16,
            Self::GeometryShaderCopyProgram => 10,
            Self::TextureHeader if v0 => 10,
            Self::TextureHeader => 11,
            Self::TextureImageData if v0 => 11,
            Self::TextureImageData => 12,
            Self::TextureMipData if v0 => 12,
            Self::TextureMipData => 13,
            Self::Unknown(code) => code,
        }
    }
}

/// On-disk block header record (0x20 bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct RawBlockHeader {
    pub magic: u32,
    pub size: u32,
    pub major_version: u32,
    pub minor_version: u32,
    pub block_type: u32,
    pub data_size: u32,
    pub id: u32,
    pub type_index: u32,
}

const _: () = assert!(std::mem::size_of::<RawBlockHeader>() == BlockHeader::SIZE);

impl ByteSwap for RawBlockHeader {
    #[inline]
    fn byte_swap(&mut self) {
        swap_words(self);
    }
}

/// A decoded block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub major_version: u32,
    pub minor_version: u32,
    pub block_type: BlockType,
    pub data_size: u32,
    pub id: u32,
    pub type_index: u32,
}

impl BlockHeader {
    /// Serialized block header size.
    pub const SIZE: usize = 0x20;

    /// Create a header for the given block version.
    pub fn new(major_version: u32, minor_version: u32, block_type: BlockType, data_size: u32) -> Self {
        Self {
            major_version,
            minor_version,
            block_type,
            data_size,
            id: 0,
            type_index: 0,
        }
    }

    /// Verify a raw block header record.
    pub fn verify(raw: &RawBlockHeader) -> Result<()> {
        if raw.magic != BLOCK_MAGIC {
            return Err(Error::MagicMismatch {
                what: "block header",
                expected: BLOCK_MAGIC,
                actual: raw.magic,
            });
        }
        if raw.size as usize != Self::SIZE {
            return Err(Error::SizeMismatch {
                what: "block header",
                expected: Self::SIZE,
                actual: raw.size as usize,
            });
        }
        if raw.major_version > 1 {
            return Err(Error::VersionUnsupported {
                what: "block header",
                major: raw.major_version,
                minor: raw.minor_version,
            });
        }
        if raw.block_type == CODE_INVALID {
            return Err(Error::InvalidBlockType(raw.block_type));
        }
        if BlockType::from_code(raw.major_version, raw.block_type) == BlockType::End
            && raw.data_size != 0
        {
            return Err(Error::SizeMismatch {
                what: "end block",
                expected: 0,
                actual: raw.data_size as usize,
            });
        }
        Ok(())
    }

    /// Convert a raw record without verification.
    pub fn from_raw(raw: &RawBlockHeader) -> Self {
        Self {
            major_version: raw.major_version,
            minor_version: raw.minor_version,
            block_type: BlockType::from_code(raw.major_version, raw.block_type),
            data_size: raw.data_size,
            id: raw.id,
            type_index: raw.type_index,
        }
    }

    /// Convert into a raw record.
    pub fn to_raw(&self) -> RawBlockHeader {
        RawBlockHeader {
            magic: BLOCK_MAGIC,
            size: Self::SIZE as u32,
            major_version: self.major_version,
            minor_version: self.minor_version,
            block_type: self.block_type.code(self.major_version),
            data_size: self.data_size,
            id: self.id,
            type_index: self.type_index,
        }
    }

    /// Read and verify a block header.
    pub fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let raw: RawBlockHeader = reader.read_record()?;
        Self::verify(&raw)?;
        Ok(Self::from_raw(&raw))
    }

    /// Read a block header without verification.
    pub fn decode_unverified(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let raw: RawBlockHeader = reader.read_record()?;
        Ok(Self::from_raw(&raw))
    }

    /// Verify and write the block header.
    pub fn encode(&self, writer: &mut BinaryWriter) -> Result<()> {
        let raw = self.to_raw();
        Self::verify(&raw)?;
        writer.write_record(&raw);
        Ok(())
    }
}
