//! GX2 texture to KTX export.

use gtx_common::{BinaryWriter, Endian};
use gtx_gx2::{AaMode, Surface, SurfaceDim, Texture, TileMode, TilingEngine};
use tracing::debug;

use crate::format::gl_format;
use crate::header::{KtxHeader, KTX_ENDIANNESS};
use crate::{Error, Result};

/// Untile a 2D texture into a linear surface with the same levels.
pub fn untile<E: TilingEngine + ?Sized>(engine: &E, texture: &Texture) -> Result<Surface> {
    let tiled = &texture.surface;
    if tiled.dim != SurfaceDim::Tex2D || tiled.depth > 1 {
        return Err(Error::UnsupportedFeature("only single 2D textures can be exported"));
    }
    if tiled.image.is_none() {
        return Err(gtx_gx2::Error::MissingData("image").into());
    }
    let num_mips = tiled.num_mips.max(1);
    if num_mips > 1 && tiled.mips.is_none() {
        return Err(gtx_gx2::Error::MissingData("mip").into());
    }

    let mut linear = Surface {
        dim: SurfaceDim::Tex2D,
        width: tiled.width,
        height: tiled.height,
        depth: 1,
        num_mips,
        format: tiled.format,
        aa: AaMode::X1,
        usage: tiled.usage,
        tile_mode: TileMode::LinearSpecial,
        ..Default::default()
    };
    engine.compute_footprint(&mut linear)?;
    linear.image = Some(vec![0; linear.image_size as usize]);
    if num_mips > 1 {
        linear.mips = Some(vec![0; linear.mip_size as usize]);
    }

    for level in 0..num_mips {
        engine.copy_surface(tiled, level, 0, &mut linear, level, 0)?;
    }
    Ok(linear)
}

/// Export a texture as a little-endian KTX 1.1 file.
pub fn export_ktx<E: TilingEngine + ?Sized>(engine: &E, texture: &Texture) -> Result<Vec<u8>> {
    let format = texture.surface.format;
    let gl = gl_format(format).ok_or(Error::UnsupportedFormat(format))?;
    let linear = untile(engine, texture)?;

    let header = KtxHeader {
        endianness: KTX_ENDIANNESS,
        gl_type: gl.gl_type,
        gl_type_size: gl.type_size,
        // compressed data carries no client format
        gl_format: if gl.gl_type == 0 { 0 } else { gl.base },
        gl_internal_format: gl.internal,
        gl_base_internal_format: gl.base,
        pixel_width: linear.width,
        pixel_height: linear.height,
        pixel_depth: 0,
        number_of_array_elements: 0,
        number_of_faces: 1,
        number_of_mipmap_levels: linear.num_mips,
        bytes_of_key_value_data: 0,
    };

    let levels = linear.levels()?;
    let payload: usize = levels.iter().map(|level| 4 + level.len().next_multiple_of(4)).sum();
    let mut writer = BinaryWriter::with_capacity(Endian::Little, KtxHeader::FILE_HEADER_SIZE + payload);
    header.encode(&mut writer);
    for level in &levels {
        let size = u32::try_from(level.len())
            .map_err(|_| Error::UnsupportedFeature("levels larger than 4 GiB"))?;
        writer.write_u32(size)?;
        writer.write_bytes(level);
        writer.write_zeros((4 - level.len() % 4) % 4);
    }

    debug!(
        width = linear.width,
        height = linear.height,
        mips = linear.num_mips,
        format = %format,
        bytes = writer.position(),
        "exported KTX"
    );
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::import_ktx;
    use crate::import::tests::rgba8_file;
    use gtx_gx2::testing::FlatTiling;
    use gtx_gx2::{ImportOptions, SurfaceFormat};

    #[test]
    fn test_round_trip() {
        let data = rgba8_file(4, 4, &[64, 16]);
        let texture = import_ktx(&FlatTiling, &data, &ImportOptions::default()).unwrap();
        let exported = export_ktx(&FlatTiling, &texture).unwrap();
        assert_eq!(exported, data);
    }

    #[test]
    fn test_untile_levels() {
        let data = rgba8_file(4, 4, &[64, 16]);
        let texture = import_ktx(&FlatTiling, &data, &ImportOptions::default()).unwrap();
        let linear = untile(&FlatTiling, &texture).unwrap();
        assert_eq!(linear.tile_mode, TileMode::LinearSpecial);
        let levels = linear.levels().unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[1], &[2u8; 16][..]);
    }

    #[test]
    fn test_rejects_missing_image() {
        let mut texture = Texture::default();
        texture.surface.width = 4;
        texture.surface.height = 4;
        texture.surface.format = SurfaceFormat::UNORM_RGBA8;
        assert!(matches!(
            export_ktx(&FlatTiling, &texture),
            Err(Error::Gx2(gtx_gx2::Error::MissingData("image")))
        ));
    }

    #[test]
    fn test_rejects_format_without_gl_equivalent() {
        let mut texture = Texture::default();
        texture.surface.format = SurfaceFormat::SINT_RGB10A2;
        assert!(matches!(
            export_ktx(&FlatTiling, &texture),
            Err(Error::UnsupportedFormat(SurfaceFormat::SINT_RGB10A2))
        ));
    }

    #[test]
    fn test_rejects_cube() {
        let mut texture = Texture::default();
        texture.surface.format = SurfaceFormat::UNORM_RGBA8;
        texture.surface.dim = SurfaceDim::Cube;
        texture.surface.depth = 6;
        assert!(matches!(
            export_ktx(&FlatTiling, &texture),
            Err(Error::UnsupportedFeature(_))
        ));
    }
}
