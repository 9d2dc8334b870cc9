//! Texture register synthesis.
//!
//! Derives the five hardware descriptor words of a texture from its logical
//! surface and view parameters. The words are never stored; callers recompute
//! them whenever they are needed.

use crate::{AaMode, Error, Result, SurfaceDim, SurfaceFormat, SurfaceUse, Texture, TileMode};

/// Number of texture register words.
pub const REG_COUNT: usize = 5;

/// Performance modulation written by GX2 v7 tooling.
const PERF_MODULATION_V7: u32 = 7;
const MAX_ANISO_RATIO: u32 = 4;
const REQUEST_SIZE: u32 = 2;
/// Resource type: valid texture.
const RESOURCE_TYPE: u32 = 2;

/// Check that a view range `[first, first + count)` lies within `limit`.
pub(crate) fn check_view(what: &'static str, first: u32, count: u32, limit: u32) -> Result<()> {
    let in_range = first == 0 || first < limit;
    let fits = first.checked_add(count).is_some_and(|end| end <= limit);
    if in_range && fits {
        Ok(())
    } else {
        Err(Error::Range {
            what,
            first,
            count,
            limit,
        })
    }
}

/// Compute the register words for `texture`.
///
/// `gfd_v7` selects the layout produced by GFD 7.x tooling.
pub fn synthesize(texture: &Texture, gfd_v7: bool) -> Result<[u32; REG_COUNT]> {
    let surface = &texture.surface;

    if !surface.usage.contains(SurfaceUse::TEXTURE) {
        return Err(Error::Precomposition("surface is not usable as a texture"));
    }
    if matches!(surface.tile_mode, TileMode::Default | TileMode::LinearSpecial) {
        return Err(Error::Precomposition("tile mode must be a hardware tile mode"));
    }
    if surface.alignment == 0 {
        return Err(Error::Precomposition("surface alignment is zero"));
    }
    if surface.pitch == 0 {
        return Err(Error::Precomposition("surface pitch is zero"));
    }

    let view_num_mips = texture.view_num_mips.max(1);
    let view_num_slices = texture.view_num_slices.max(1);
    let height = surface.height.max(1);
    let depth = surface.depth.max(1);
    let num_mips = surface.num_mips.max(1);

    check_view("mip", texture.view_first_mip, view_num_mips, num_mips)?;
    check_view("slice", texture.view_first_slice, view_num_slices, depth)?;

    if surface.aa != AaMode::X1 {
        if num_mips != 1 {
            return Err(Error::Precomposition("multisampled surface has mip levels"));
        }
        if !surface.dim.is_msaa() {
            return Err(Error::Precomposition("multisampled surface has a non-MSAA dimension"));
        }
    }

    let format = surface.format;
    let hw_format = format.hardware();

    let mut tile_type = 0;
    if surface.usage.contains(SurfaceUse::DEPTH_BUFFER) {
        if format == SurfaceFormat::UNORM_D24_S8 {
            return Err(Error::Precomposition("depth buffer cannot use UNORM_D24_S8"));
        }
        if gfd_v7 && format == SurfaceFormat::FLOAT_D32_UINT_S8_X24 {
            return Err(Error::Precomposition(
                "depth buffer cannot use FLOAT_D32_UINT_S8_X24",
            ));
        }
        if !format.is_depth_capable() {
            return Err(Error::Precomposition("format is not depth capable"));
        }
        tile_type = 1;
    }

    let pitch_scale = if format.is_compressed() { 4 } else { 1 };
    let pitch_field = (surface.pitch.wrapping_mul(pitch_scale) / 8).wrapping_sub(1) & 0x7FF;

    let reg0 = (u32::from(surface.dim) & 7)
        | surface.tile_mode.hardware() << 3
        | tile_type << 7
        | pitch_field << 8
        | surface.width.wrapping_sub(1) << 19;

    let depth_field = match surface.dim {
        dim if dim.is_layered() => depth - 1,
        SurfaceDim::Cube => {
            if depth % 6 != 0 {
                return Err(Error::Precomposition("cube depth is not a multiple of 6"));
            }
            depth / 6 - 1
        }
        _ => 0,
    } & 0x1FFF;

    let reg1 = ((height - 1) & 0x1FFF) | depth_field << 13 | hw_format << 26;

    let sign = u32::from(format.is_signed());
    let num_format = if format.is_float() {
        2
    } else if format.is_int() {
        1
    } else {
        0
    };
    let surface_mode = u32::from(!gfd_v7 && !format.is_float());
    let force_degamma = u32::from(format.is_srgb());
    let comp_sel = texture.comp_sel.0;

    let reg2 = sign
        | sign << 2
        | sign << 4
        | sign << 6
        | num_format << 8
        | surface_mode << 10
        | force_degamma << 11
        | REQUEST_SIZE << 14
        | ((comp_sel >> 24) & 7) << 16
        | ((comp_sel >> 16) & 7) << 19
        | ((comp_sel >> 8) & 7) << 22
        | (comp_sel & 7) << 25
        | texture.view_first_mip << 28;

    let last_level = match surface.aa {
        AaMode::X1 => texture.view_first_mip + view_num_mips - 1,
        aa => aa.samples().trailing_zeros(),
    };
    let last_slice = texture.view_first_slice + view_num_slices - 1;
    let yuv = u32::from(gfd_v7 && surface.dim == SurfaceDim::Cube && depth_field != 0);

    let reg3 = (last_level & 0xF)
        | (texture.view_first_slice & 0x1FFF) << 4
        | (last_slice & 0x1FFF) << 17
        | yuv << 30;

    let perf_modulation = if gfd_v7 { PERF_MODULATION_V7 } else { 0 };
    let reg4 = MAX_ANISO_RATIO << 2 | perf_modulation << 5 | RESOURCE_TYPE << 30;

    Ok([reg0, reg1, reg2, reg3, reg4])
}
