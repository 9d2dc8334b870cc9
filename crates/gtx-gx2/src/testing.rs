//! A reference tiling engine for tests.
//!
//! [`FlatTiling`] performs no real tiling: every tile mode uses the linear
//! layout, so copies between surfaces are plain byte copies. It is enough to
//! exercise the codec and importers without hardware addressing math.

use std::ops::Range;

use crate::surface::{MAX_MIP_LEVELS, MIP_OFFSET_COUNT};
use crate::{Error, Result, Surface, TileMode, TilingEngine};

/// Alignment reported for tiled surfaces.
pub const FLAT_TILED_ALIGNMENT: u32 = 0x200;

/// Linear, contiguous surface layout for every tile mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTiling;

impl FlatTiling {
    fn level_size(surface: &Surface, level: u32) -> Result<u32> {
        let width = (surface.width >> level).max(1);
        let height = (surface.height >> level).max(1);
        if surface.format.bits_per_element().is_none() {
            return Err(Error::InvalidEnum {
                field: "surface format",
                value: surface.format.0,
            });
        }
        surface
            .format
            .level_size(width, height)
            .and_then(|size| size.checked_mul(u64::from(surface.depth.max(1))))
            .and_then(|total| u32::try_from(total).ok())
            .ok_or_else(|| Error::Tiling(format!("level {level} exceeds 4 GiB")))
    }

    /// Byte range of a level slice, and whether it lives in the mip buffer.
    fn slice_range(surface: &Surface, level: u32, slice: u32) -> Result<(bool, Range<usize>)> {
        let num_mips = surface.num_mips.max(1);
        let depth = surface.depth.max(1);
        if level >= num_mips || slice >= depth {
            return Err(Error::Tiling(format!(
                "level {level} slice {slice} outside {num_mips} levels and {depth} slices"
            )));
        }

        let (in_mips, start, end) = if level == 0 {
            (false, 0, surface.image_size)
        } else {
            let start = if level == 1 {
                0
            } else {
                surface.mip_offsets[level as usize - 1]
            };
            let end = if level < num_mips - 1 {
                surface.mip_offsets[level as usize]
            } else {
                surface.mip_size
            };
            (true, start, end)
        };

        let slice_len = (end.saturating_sub(start) / depth) as usize;
        let offset = start as usize + slice as usize * slice_len;
        Ok((in_mips, offset..offset + slice_len))
    }
}

impl TilingEngine for FlatTiling {
    fn compute_footprint(&self, surface: &mut Surface) -> Result<()> {
        if surface.tile_mode == TileMode::Default {
            surface.tile_mode = TileMode::Tiled2DThin1;
        }
        let num_mips = surface.num_mips.max(1);
        if num_mips > MAX_MIP_LEVELS {
            return Err(Error::Verification("surface declares more than 14 mip levels"));
        }

        surface.image_size = Self::level_size(surface, 0)?;
        surface.mip_offsets = [0; MIP_OFFSET_COUNT];

        let mut mip_size = 0u32;
        for level in 1..num_mips {
            if level >= 2 {
                surface.mip_offsets[level as usize - 1] = mip_size;
            }
            mip_size = mip_size
                .checked_add(Self::level_size(surface, level)?)
                .ok_or_else(|| Error::Tiling("mip chain exceeds 4 GiB".to_owned()))?;
        }
        if num_mips > 1 {
            surface.mip_offsets[0] = surface.image_size;
        }
        surface.mip_size = mip_size;

        let block_dim = surface.format.block_dim();
        surface.pitch = surface.width.max(1).div_ceil(block_dim);
        surface.alignment = match surface.tile_mode {
            TileMode::LinearSpecial => 1,
            _ => FLAT_TILED_ALIGNMENT,
        };
        Ok(())
    }

    fn copy_surface(
        &self,
        src: &Surface,
        src_level: u32,
        src_slice: u32,
        dst: &mut Surface,
        dst_level: u32,
        dst_slice: u32,
    ) -> Result<()> {
        let (src_in_mips, src_range) = Self::slice_range(src, src_level, src_slice)?;
        let (dst_in_mips, dst_range) = Self::slice_range(dst, dst_level, dst_slice)?;
        if src_range.len() != dst_range.len() {
            return Err(Error::Tiling(format!(
                "level size mismatch: {} vs {} bytes",
                src_range.len(),
                dst_range.len()
            )));
        }

        let src_buffer = if src_in_mips { &src.mips } else { &src.image };
        let src_buffer = src_buffer
            .as_deref()
            .ok_or(Error::MissingData(if src_in_mips { "mip" } else { "image" }))?;
        let src_bytes = src_buffer.get(src_range.clone()).ok_or(Error::Truncated {
            what: "source",
            needed: src_range.end,
            available: src_buffer.len(),
        })?;

        let dst_buffer = if dst_in_mips { &mut dst.mips } else { &mut dst.image };
        let dst_buffer = dst_buffer
            .as_deref_mut()
            .ok_or(Error::MissingData(if dst_in_mips { "mip" } else { "image" }))?;
        let available = dst_buffer.len();
        let dst_bytes = dst_buffer.get_mut(dst_range.clone()).ok_or(Error::Truncated {
            what: "destination",
            needed: dst_range.end,
            available,
        })?;

        dst_bytes.copy_from_slice(src_bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SurfaceDim, SurfaceFormat};

    #[test]
    fn test_footprint_bc1_chain() {
        let mut surface = Surface {
            width: 64,
            height: 64,
            num_mips: 4,
            format: SurfaceFormat::UNORM_BC1,
            ..Default::default()
        };
        FlatTiling.compute_footprint(&mut surface).unwrap();
        assert_eq!(surface.tile_mode, TileMode::Tiled2DThin1);
        assert_eq!(surface.image_size, 2048);
        assert_eq!(surface.mip_size, 512 + 128 + 32);
        assert_eq!(surface.mip_offsets[..3], [2048, 512, 640]);
        assert_eq!(surface.pitch, 16);
        assert_eq!(surface.alignment, FLAT_TILED_ALIGNMENT);
    }

    #[test]
    fn test_footprint_overflow() {
        // every level of a 4x4 BC1 array is one block per slice
        let mut surface = Surface {
            dim: SurfaceDim::Tex2DArray,
            width: 4,
            height: 4,
            depth: u32::MAX / 8,
            num_mips: 3,
            format: SurfaceFormat::UNORM_BC1,
            ..Default::default()
        };
        assert!(matches!(
            FlatTiling.compute_footprint(&mut surface),
            Err(Error::Tiling(_))
        ));

        let mut surface = Surface {
            width: u32::MAX,
            height: u32::MAX,
            format: SurfaceFormat::UNORM_RGBA8,
            ..Default::default()
        };
        assert!(matches!(
            FlatTiling.compute_footprint(&mut surface),
            Err(Error::Tiling(_))
        ));
    }

    #[test]
    fn test_copy_requires_buffers() {
        let mut src = Surface {
            width: 4,
            height: 4,
            format: SurfaceFormat::UNORM_R8,
            tile_mode: TileMode::LinearSpecial,
            ..Default::default()
        };
        FlatTiling.compute_footprint(&mut src).unwrap();
        let mut dst = src.clone();
        src.image = Some(vec![7; 16]);
        assert!(matches!(
            FlatTiling.copy_surface(&src, 0, 0, &mut dst, 0, 0),
            Err(Error::MissingData("image"))
        ));

        dst.image = Some(vec![0; 16]);
        FlatTiling.copy_surface(&src, 0, 0, &mut dst, 0, 0).unwrap();
        assert_eq!(dst.image, src.image);
    }
}
