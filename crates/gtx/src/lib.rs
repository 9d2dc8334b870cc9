//! GTX - GX2 texture archive library.
//!
//! This crate provides a unified interface to the GTX library ecosystem
//! for reading, writing and importing Wii U GPU texture archives.
//!
//! # Crates
//!
//! - [`gtx_common`] - Endian-aware binary reading and writing
//! - [`gtx_gx2`] - GX2 surfaces, textures, formats and register synthesis
//! - [`gtx_gfd`] - GFD/GTX archive container
//! - [`gtx_dds`] - DDS import
//! - [`gtx_ktx`] - KTX 1.1 import and export
//!
//! # Example
//!
//! ```no_run
//! use gtx::prelude::*;
//!
//! # fn engine() -> &'static dyn TilingEngine { unimplemented!() }
//! let engine = engine();
//! let dds = std::fs::read("image.dds")?;
//! let texture = import_dds(engine, &dds, &ImportOptions::default())?;
//!
//! let mut archive = GfdFile::new();
//! archive.textures.push(texture);
//! std::fs::write("image.gtx", archive.save_gtx()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use gtx_common as common;
pub use gtx_dds as dds;
pub use gtx_gfd as gfd;
pub use gtx_gx2 as gx2;
pub use gtx_ktx as ktx;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use gtx_common::{BinaryReader, BinaryWriter, Endian};
    pub use gtx_dds::import_dds;
    pub use gtx_gfd::{AlignMode, GfdFile, GfdHeader};
    pub use gtx_gx2::{
        CompSel, ImportOptions, Surface, SurfaceFormat, Texture, TileMode, TilingEngine,
    };
    pub use gtx_ktx::{export_ktx, import_ktx};
}

pub use gtx_gfd::GfdFile;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use gtx_gx2::testing::FlatTiling;

    fn ktx_file() -> Vec<u8> {
        let header = gtx_ktx::KtxHeader {
            endianness: gtx_ktx::KTX_ENDIANNESS,
            gl_type: gtx_ktx::format::gl::UNSIGNED_BYTE,
            gl_type_size: 1,
            gl_format: gtx_ktx::format::gl::RGBA,
            gl_internal_format: gtx_ktx::format::gl::RGBA8,
            gl_base_internal_format: gtx_ktx::format::gl::RGBA,
            pixel_width: 8,
            pixel_height: 8,
            number_of_faces: 1,
            number_of_mipmap_levels: 1,
            ..Default::default()
        };
        let mut writer = BinaryWriter::new(Endian::Little);
        header.encode(&mut writer);
        writer.write_u32(256).unwrap();
        writer.write_bytes(&(0..=255).collect::<Vec<u8>>());
        writer.into_inner()
    }

    #[test]
    fn test_import_archive_export() {
        let texture = import_ktx(&FlatTiling, &ktx_file(), &ImportOptions::default()).unwrap();

        let mut archive = GfdFile::new();
        archive.textures.push(texture);
        let bytes = archive.save_gtx().unwrap();

        let (loaded, _) = GfdFile::parse(&bytes).unwrap();
        assert_eq!(loaded.textures.len(), 1);
        assert_eq!(loaded.header.align_mode, AlignMode::Enabled);
        assert_eq!(loaded.textures[0].surface.format, SurfaceFormat::UNORM_RGBA8);

        let exported = export_ktx(&FlatTiling, &loaded.textures[0]).unwrap();
        assert_eq!(exported, ktx_file());
    }

    #[test]
    fn test_version() {
        assert_eq!(super::VERSION, env!("CARGO_PKG_VERSION"));
    }
}
