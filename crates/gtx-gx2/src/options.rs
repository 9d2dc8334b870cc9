//! Importer options.

use crate::{CompSel, TileMode};

/// Settings shared by the image importers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImportOptions {
    /// Destination tile mode. `TileMode::Default` lets the tiling engine choose.
    pub tile_mode: TileMode,
    /// Bank swizzle, shifted into the surface swizzle field.
    pub swizzle: u32,
    /// Promote RGBA8, BC1, BC2 and BC3 formats to their sRGB variants.
    pub srgb: bool,
    /// Selector template, indirected through the source channel mapping.
    pub comp_sel: CompSel,
    /// Validate registers with the GFD 7.x layout.
    pub gfd_v7: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            tile_mode: TileMode::Default,
            swizzle: 0,
            srgb: false,
            comp_sel: CompSel::RGBA,
            gfd_v7: true,
        }
    }
}

impl ImportOptions {
    /// Set the destination tile mode.
    pub fn with_tile_mode(mut self, tile_mode: TileMode) -> Self {
        self.tile_mode = tile_mode;
        self
    }

    /// Set the bank swizzle.
    pub fn with_swizzle(mut self, swizzle: u32) -> Self {
        self.swizzle = swizzle;
        self
    }

    /// Enable or disable sRGB promotion.
    pub fn with_srgb(mut self, srgb: bool) -> Self {
        self.srgb = srgb;
        self
    }

    /// Set the selector template.
    pub fn with_comp_sel(mut self, comp_sel: CompSel) -> Self {
        self.comp_sel = comp_sel;
        self
    }

    /// Select the GFD 7.x or 6.x register layout.
    pub fn with_gfd_v7(mut self, gfd_v7: bool) -> Self {
        self.gfd_v7 = gfd_v7;
        self
    }
}
