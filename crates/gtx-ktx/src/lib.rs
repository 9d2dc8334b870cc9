//! KTX 1.1 import and export for GX2 textures.
//!
//! Import accepts single 2D images with an optional mip chain. Export untiles
//! a texture through a [`gtx_gx2::TilingEngine`] and writes a little-endian
//! file.

mod error;
mod export;
pub mod format;
mod header;
mod import;

pub use error::{Error, Result};
pub use export::{export_ktx, untile};
pub use format::{format_from_gl, gl_format, GlFormat};
pub use header::{KtxHeader, KTX_ENDIANNESS, KTX_IDENTIFIER};
pub use import::{import_ktx, import_mip_count, is_ktx, MAX_IMPORT_MIPS};
