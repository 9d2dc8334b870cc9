//! DDS import for GX2 textures.
//!
//! Reads legacy (non-DX10) DDS files holding a single 2D image with an
//! optional mip chain, picks the matching GX2 surface format and tiles the
//! data through a [`gtx_gx2::TilingEngine`].

mod error;
mod header;
mod import;

pub use error::{Error, Result};
pub use header::{caps2, pixel_flags, DdsHeader, DdsPixelFormat, FourCC};
pub use import::{
    check_supported, compose_selectors, detect_format, import_dds, ChannelMapping, DetectedFormat,
};

/// DDS file magic.
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";
