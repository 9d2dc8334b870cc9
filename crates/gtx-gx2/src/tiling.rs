//! Boundary to the surface tiling and addressing engine.

use crate::{Result, Surface};

/// Computes hardware memory layouts and performs tile-order copies.
///
/// Implementations own all addressing math. The codec and importers only ever
/// reach surface memory through this trait.
pub trait TilingEngine {
    /// Fill in a surface's layout fields.
    ///
    /// Reads the logical fields (dimension, size, depth, mip count, format,
    /// AA mode, usage, tile mode) and sets `image_size`, `mip_size`,
    /// `alignment`, `pitch` and `mip_offsets`. A `TileMode::Default` tile mode
    /// must be replaced by the mode the engine chose.
    fn compute_footprint(&self, surface: &mut Surface) -> Result<()>;

    /// Copy one level/slice of `src` into one level/slice of `dst`,
    /// converting between the two surfaces' tile modes.
    ///
    /// Both surfaces must own buffers large enough for the addressed level.
    fn copy_surface(
        &self,
        src: &Surface,
        src_level: u32,
        src_slice: u32,
        dst: &mut Surface,
        dst_level: u32,
        dst_slice: u32,
    ) -> Result<()>;
}

impl<T: TilingEngine + ?Sized> TilingEngine for &T {
    fn compute_footprint(&self, surface: &mut Surface) -> Result<()> {
        (**self).compute_footprint(surface)
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
        (**self).copy_surface(src, src_level, src_slice, dst, dst_level, dst_slice)
    }
}
