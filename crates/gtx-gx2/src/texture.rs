//! GX2 texture descriptor.

use std::fmt;

use gtx_common::{swap_words, BinaryReader, BinaryWriter, ByteSwap};
use tracing::debug;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::regs::{self, check_view, REG_COUNT};
use crate::surface::RawSurface;
use crate::{
    AaMode, CompSel, Error, Result, Surface, SurfaceDim, SurfaceFormat, SurfaceUse, TileMode,
    TilingEngine,
};

/// On-disk texture record (0x9C bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct RawTexture {
    pub surface: RawSurface,
    pub view_first_mip: u32,
    pub view_num_mips: u32,
    pub view_first_slice: u32,
    pub view_num_slices: u32,
    pub comp_sel: u32,
    pub regs: [u32; REG_COUNT],
}

const _: () = assert!(std::mem::size_of::<RawTexture>() == Texture::SIZE);

impl ByteSwap for RawTexture {
    #[inline]
    fn byte_swap(&mut self) {
        swap_words(self);
    }
}

/// A surface together with its sampling view.
///
/// Hardware register words are derived with [`Texture::registers`] and never
/// stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Texture {
    pub surface: Surface,
    pub view_first_mip: u32,
    pub view_num_mips: u32,
    pub view_first_slice: u32,
    pub view_num_slices: u32,
    pub comp_sel: CompSel,
}

/// Linear level data used to build a tiled 2D texture.
#[derive(Debug, Clone, Copy)]
pub struct LinearImage<'a> {
    pub width: u32,
    pub height: u32,
    pub num_mips: u32,
    pub format: SurfaceFormat,
    pub comp_sel: CompSel,
    /// Level 0 bytes.
    pub image: &'a [u8],
    /// Levels 1 and up, packed back to back.
    pub mips: &'a [u8],
}

impl Texture {
    /// Serialized record size.
    pub const SIZE: usize = 0x9C;

    /// Convert a host-order record without verification. Register words are
    /// discarded.
    pub fn from_raw(raw: &RawTexture) -> Result<Self> {
        Ok(Self {
            surface: Surface::from_raw(&raw.surface)?,
            view_first_mip: raw.view_first_mip,
            view_num_mips: raw.view_num_mips,
            view_first_slice: raw.view_first_slice,
            view_num_slices: raw.view_num_slices,
            comp_sel: CompSel(raw.comp_sel),
        })
    }

    /// Convert into a host-order record with the given register words.
    pub fn to_raw(&self, regs: [u32; REG_COUNT]) -> RawTexture {
        RawTexture {
            surface: self.surface.to_raw(),
            view_first_mip: self.view_first_mip,
            view_num_mips: self.view_num_mips,
            view_first_slice: self.view_first_slice,
            view_num_slices: self.view_num_slices,
            comp_sel: self.comp_sel.0,
            regs,
        }
    }

    /// Read a record in the reader's byte order, then verify and clamp it.
    pub fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let mut texture = Self::decode_unverified(reader)?;
        texture.surface.verify_for_serialization()?;
        texture.surface.clamp();
        texture.verify_for_serialization()?;
        texture.view_num_mips = texture.view_num_mips.max(1);
        texture.view_num_slices = texture.view_num_slices.max(1);
        Ok(texture)
    }

    /// Read a record in the reader's byte order, checking only enum fields.
    pub fn decode_unverified(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let raw: RawTexture = reader.read_record()?;
        Self::from_raw(&raw)
    }

    /// Verify the texture, synthesize its registers and write its record.
    pub fn encode(&self, writer: &mut BinaryWriter, gfd_v7: bool) -> Result<()> {
        self.surface.verify_for_serialization()?;
        self.verify_for_serialization()?;
        let regs = self.registers(gfd_v7)?;
        writer.write_record(&self.to_raw(regs));
        Ok(())
    }

    /// Texture-level checks applied to every texture entering or leaving an
    /// archive.
    pub fn verify_for_serialization(&self) -> Result<()> {
        if self.surface.aa != AaMode::X1 {
            return Err(Error::Verification("texture surface is multisampled"));
        }
        if !self.surface.usage.contains(SurfaceUse::TEXTURE) {
            return Err(Error::Verification("surface is not usable as a texture"));
        }

        let num_mips = self.surface.num_mips.max(1);
        let depth = self.surface.depth.max(1);
        check_view("mip", self.view_first_mip, self.view_num_mips.max(1), num_mips)?;
        check_view("slice", self.view_first_slice, self.view_num_slices.max(1), depth)
    }

    /// Hardware register words for this texture.
    #[inline]
    pub fn registers(&self, gfd_v7: bool) -> Result<[u32; REG_COUNT]> {
        regs::synthesize(self, gfd_v7)
    }

    /// Build a tiled 2D texture from linear level data.
    ///
    /// The engine sizes a linear source surface and the tiled destination,
    /// then tiles each level. `swizzle` is the bank swizzle value before it is
    /// shifted into the surface's swizzle field.
    pub fn from_linear_2d<E: TilingEngine + ?Sized>(
        engine: &E,
        source: &LinearImage<'_>,
        tile_mode: TileMode,
        swizzle: u32,
        gfd_v7: bool,
    ) -> Result<Self> {
        let num_mips = source.num_mips.max(1);

        let mut linear = Surface {
            dim: SurfaceDim::Tex2D,
            width: source.width,
            height: source.height,
            depth: 1,
            num_mips,
            format: source.format,
            aa: AaMode::X1,
            usage: SurfaceUse::TEXTURE,
            tile_mode: TileMode::LinearSpecial,
            swizzle: 0,
            ..Default::default()
        };
        engine.compute_footprint(&mut linear)?;

        let image_size = linear.image_size as usize;
        if source.image.len() < image_size {
            return Err(Error::Truncated {
                what: "image",
                needed: image_size,
                available: source.image.len(),
            });
        }
        linear.image = Some(source.image[..image_size].to_vec());

        if num_mips > 1 {
            let mip_size = linear.mip_size as usize;
            if source.mips.len() < mip_size {
                return Err(Error::Truncated {
                    what: "mip",
                    needed: mip_size,
                    available: source.mips.len(),
                });
            }
            linear.mips = Some(source.mips[..mip_size].to_vec());
        }

        let mut texture = Self {
            surface: Surface {
                dim: SurfaceDim::Tex2D,
                width: source.width,
                height: source.height,
                depth: 1,
                num_mips,
                format: source.format,
                aa: AaMode::X1,
                usage: SurfaceUse::TEXTURE,
                tile_mode,
                swizzle: swizzle << 8,
                ..Default::default()
            },
            view_first_mip: 0,
            view_num_mips: num_mips,
            view_first_slice: 0,
            view_num_slices: 1,
            comp_sel: source.comp_sel,
        };
        engine.compute_footprint(&mut texture.surface)?;
        texture.registers(gfd_v7)?;

        texture.surface.image = Some(vec![0; texture.surface.image_size as usize]);
        if num_mips > 1 {
            texture.surface.mips = Some(vec![0; texture.surface.mip_size as usize]);
        }

        for level in 0..num_mips {
            engine.copy_surface(&linear, level, 0, &mut texture.surface, level, 0)?;
        }

        debug!(
            width = source.width,
            height = source.height,
            num_mips,
            format = %source.format,
            tile_mode = ?texture.surface.tile_mode,
            "built tiled texture from linear data"
        );

        Ok(texture)
    }
}

impl fmt::Display for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.surface)?;
        writeln!(f)?;
        writeln!(f, "// ----- GX2 Texture View -----")?;
        writeln!(f, "  viewFirstMip    = {}", self.view_first_mip)?;
        writeln!(f, "  viewNumMips     = {}", self.view_num_mips)?;
        writeln!(f, "  viewFirstSlice  = {}", self.view_first_slice)?;
        writeln!(f, "  viewNumSlices   = {}", self.view_num_slices)?;
        writeln!(f)?;
        writeln!(f, "// ----- GX2 Component Selectors -----")?;
        let labels = ["Red", "Green", "Blue", "Alpha"];
        for (label, channel) in labels.iter().zip(self.comp_sel.channels()) {
            let name = channel.map_or("Invalid", |c| c.name());
            writeln!(f, "  {:<16}= {name}", format!("{label} Channel"))?;
        }
        Ok(())
    }
}
