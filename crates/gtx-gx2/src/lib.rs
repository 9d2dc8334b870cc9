//! GX2 surface and texture descriptors.
//!
//! This crate models the GPU-side description of a texture:
//!
//! - [`Surface`] and [`Texture`] with their on-disk records ([`RawSurface`], [`RawTexture`])
//! - [`SurfaceFormat`] and the GX2 enumerations
//! - [`regs::synthesize`] for hardware register words
//! - [`TilingEngine`], the boundary to the addressing engine
//!
//! # Example
//!
//! ```
//! use gtx_gx2::{CompSel, Surface, SurfaceFormat, Texture, TileMode};
//!
//! let texture = Texture {
//!     surface: Surface {
//!         width: 256,
//!         height: 256,
//!         format: SurfaceFormat::UNORM_BC1,
//!         tile_mode: TileMode::Tiled2DThin1,
//!         image_size: 32768,
//!         alignment: 0x1000,
//!         pitch: 64,
//!         ..Default::default()
//!     },
//!     view_num_mips: 1,
//!     view_num_slices: 1,
//!     comp_sel: CompSel::RGBA,
//!     ..Default::default()
//! };
//!
//! let regs = texture.registers(true).unwrap();
//! assert_eq!(regs[0], 0x07F8_1F21);
//! ```

mod enums;
mod error;
mod format;
mod options;
pub mod regs;
mod surface;
mod texture;
mod tiling;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use enums::{AaMode, Channel, CompSel, SurfaceDim, SurfaceUse, TileMode};
pub use error::{Error, Result};
pub use format::SurfaceFormat;
pub use options::ImportOptions;
pub use surface::{RawSurface, Surface, MAX_MIP_LEVELS, MIP_OFFSET_COUNT};
pub use texture::{LinearImage, RawTexture, Texture};
pub use tiling::TilingEngine;
