//! GX2 surface descriptor.

use std::fmt;

use gtx_common::{swap_words, BinaryReader, BinaryWriter, ByteSwap};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{AaMode, Error, Result, SurfaceDim, SurfaceFormat, SurfaceUse, TileMode};

/// Number of entries in the mip offset table.
pub const MIP_OFFSET_COUNT: usize = 13;

/// Largest mip count a surface may declare.
pub const MAX_MIP_LEVELS: u32 = 14;

/// On-disk surface record (0x74 bytes).
///
/// Field order matches the serialized layout. The two pointer slots are
/// always zero on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct RawSurface {
    pub dim: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub num_mips: u32,
    pub format: u32,
    pub aa: u32,
    pub usage: u32,
    pub image_size: u32,
    pub image_ptr: u32,
    pub mip_size: u32,
    pub mip_ptr: u32,
    pub tile_mode: u32,
    pub swizzle: u32,
    pub alignment: u32,
    pub pitch: u32,
    pub mip_offsets: [u32; MIP_OFFSET_COUNT],
}

const _: () = assert!(std::mem::size_of::<RawSurface>() == Surface::SIZE);

impl ByteSwap for RawSurface {
    #[inline]
    fn byte_swap(&mut self) {
        swap_words(self);
    }
}

/// A logical GX2 surface with its owned image and mip buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Surface {
    pub dim: SurfaceDim,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub num_mips: u32,
    pub format: SurfaceFormat,
    pub aa: AaMode,
    pub usage: SurfaceUse,
    /// Declared byte size of the level 0 image.
    pub image_size: u32,
    /// Declared byte size of the mip chain (levels 1 and up).
    pub mip_size: u32,
    pub tile_mode: TileMode,
    pub swizzle: u32,
    pub alignment: u32,
    pub pitch: u32,
    /// `mip_offsets[0]` is the offset of the mip chain from the image start;
    /// `mip_offsets[k]` for `k >= 1` is the start of level `k + 1` within the
    /// mip chain.
    pub mip_offsets: [u32; MIP_OFFSET_COUNT],
    #[cfg_attr(feature = "serde", serde(skip))]
    pub image: Option<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub mips: Option<Vec<u8>>,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            dim: SurfaceDim::Tex2D,
            width: 0,
            height: 1,
            depth: 1,
            num_mips: 1,
            format: SurfaceFormat::INVALID,
            aa: AaMode::X1,
            usage: SurfaceUse::TEXTURE,
            image_size: 0,
            mip_size: 0,
            tile_mode: TileMode::Default,
            swizzle: 0,
            alignment: 0,
            pitch: 0,
            mip_offsets: [0; MIP_OFFSET_COUNT],
            image: None,
            mips: None,
        }
    }
}

impl Surface {
    /// Serialized record size.
    pub const SIZE: usize = 0x74;

    /// Convert a host-order record into a descriptor without verification.
    pub fn from_raw(raw: &RawSurface) -> Result<Self> {
        Ok(Self {
            dim: SurfaceDim::try_from(raw.dim)?,
            width: raw.width,
            height: raw.height,
            depth: raw.depth,
            num_mips: raw.num_mips,
            format: SurfaceFormat(raw.format),
            aa: AaMode::try_from(raw.aa)?,
            usage: SurfaceUse(raw.usage),
            image_size: raw.image_size,
            mip_size: raw.mip_size,
            tile_mode: TileMode::try_from(raw.tile_mode)?,
            swizzle: raw.swizzle,
            alignment: raw.alignment,
            pitch: raw.pitch,
            mip_offsets: raw.mip_offsets,
            image: None,
            mips: None,
        })
    }

    /// Convert into a host-order record. Buffer pointers are written as zero.
    pub fn to_raw(&self) -> RawSurface {
        RawSurface {
            dim: self.dim.into(),
            width: self.width,
            height: self.height,
            depth: self.depth,
            num_mips: self.num_mips,
            format: self.format.0,
            aa: self.aa.into(),
            usage: self.usage.0,
            image_size: self.image_size,
            image_ptr: 0,
            mip_size: self.mip_size,
            mip_ptr: 0,
            tile_mode: self.tile_mode.into(),
            swizzle: self.swizzle,
            alignment: self.alignment,
            pitch: self.pitch,
            mip_offsets: self.mip_offsets,
        }
    }

    /// Read a record in the reader's byte order, then verify and clamp it.
    pub fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let mut surface = Self::decode_unverified(reader)?;
        surface.verify_for_serialization()?;
        surface.clamp();
        Ok(surface)
    }

    /// Read a record in the reader's byte order, checking only enum fields.
    pub fn decode_unverified(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let raw: RawSurface = reader.read_record()?;
        Self::from_raw(&raw)
    }

    /// Verify the descriptor and write its record in the writer's byte order.
    pub fn encode(&self, writer: &mut BinaryWriter) -> Result<()> {
        self.verify_for_serialization()?;
        writer.write_record(&self.to_raw());
        Ok(())
    }

    /// Structural checks applied to every surface entering or leaving an archive.
    pub fn verify_for_serialization(&self) -> Result<()> {
        if !self.format.is_known() {
            return Err(Error::InvalidEnum {
                field: "surface format",
                value: self.format.0,
            });
        }
        if self.width == 0 {
            return Err(Error::Verification("surface width is zero"));
        }
        if self.num_mips > MAX_MIP_LEVELS {
            return Err(Error::Verification("surface declares more than 14 mip levels"));
        }
        if self.tile_mode == TileMode::Default {
            return Err(Error::Verification("surface tile mode is unresolved"));
        }
        if self.image_size == 0 {
            return Err(Error::Verification("surface image size is zero"));
        }
        Ok(())
    }

    /// Raise height, depth and mip count to at least one.
    pub fn clamp(&mut self) {
        self.height = self.height.max(1);
        self.depth = self.depth.max(1);
        self.num_mips = self.num_mips.max(1);
    }

    /// Split the owned buffers into one byte slice per mip level.
    ///
    /// Level 0 comes from the image buffer, the rest from the mip chain using
    /// the mip offset table.
    pub fn levels(&self) -> Result<Vec<&[u8]>> {
        let image = self.image.as_deref().ok_or(Error::MissingData("image"))?;
        let image_size = self.image_size as usize;
        let level0 = image.get(..image_size).ok_or(Error::Truncated {
            what: "image",
            needed: image_size,
            available: image.len(),
        })?;

        let num_mips = self.num_mips.clamp(1, MAX_MIP_LEVELS) as usize;
        let mut levels = Vec::with_capacity(num_mips);
        levels.push(level0);
        if num_mips == 1 {
            return Ok(levels);
        }

        let mips = self.mips.as_deref().ok_or(Error::MissingData("mip"))?;
        for level in 1..num_mips {
            let start = if level == 1 {
                0
            } else {
                self.mip_offsets[level - 1] as usize
            };
            let end = if level < num_mips - 1 {
                self.mip_offsets[level] as usize
            } else {
                self.mip_size as usize
            };
            let slice = mips.get(start..end).ok_or(Error::Truncated {
                what: "mip",
                needed: end,
                available: mips.len(),
            })?;
            levels.push(slice);
        }
        Ok(levels)
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "// ----- GX2 Surface Info -----")?;
        writeln!(f, "  dim             = {:?}", self.dim)?;
        writeln!(f, "  width           = {}", self.width)?;
        writeln!(f, "  height          = {}", self.height)?;
        writeln!(f, "  depth           = {}", self.depth)?;
        writeln!(f, "  numMips         = {}", self.num_mips)?;
        writeln!(f, "  format          = {}", self.format)?;
        writeln!(f, "  aa              = {:?}", self.aa)?;
        writeln!(f, "  use             = {:#x}", self.usage.0)?;
        writeln!(f, "  imageSize       = {}", self.image_size)?;
        writeln!(f, "  mipSize         = {}", self.mip_size)?;
        writeln!(f, "  tileMode        = {:?}", self.tile_mode)?;
        writeln!(f, "  swizzle         = {} ({:#x})", self.swizzle, self.swizzle)?;
        writeln!(f, "  alignment       = {}", self.alignment)?;
        writeln!(f, "  pitch           = {}", self.pitch)?;
        let used = self.num_mips.saturating_sub(1).min(MIP_OFFSET_COUNT as u32) as usize;
        for (i, offset) in self.mip_offsets[..used].iter().enumerate() {
            writeln!(f, "  mipOffset[{i:2}]   = {offset}")?;
        }
        Ok(())
    }
}
