//! KTX to GX2 texture import.

use gtx_common::BinaryReader;
use gtx_gx2::{ImportOptions, LinearImage, Texture, TilingEngine};
use tracing::debug;

use crate::format::format_from_gl;
use crate::header::KtxHeader;
use crate::{Error, Result};

/// Highest mip level count taken from a KTX file.
pub const MAX_IMPORT_MIPS: u32 = 13;

/// Number of levels to import: bounded by the declared count, the base-2
/// logarithm of the width and [`MAX_IMPORT_MIPS`], but never zero.
pub fn import_mip_count(width: u32, declared: u32) -> u32 {
    let by_width = width.max(1).ilog2();
    declared.min(by_width).min(MAX_IMPORT_MIPS).max(1)
}

fn truncated(what: &'static str, needed: usize, reader: &BinaryReader<'_>) -> Error {
    Error::Truncated {
        what,
        needed,
        available: reader.remaining_bytes().len(),
    }
}

/// Import a KTX 1.1 file as a tiled GX2 texture.
///
/// Only single 2D images are accepted. Each level is stored with a 32-bit
/// size prefix and padded to four bytes.
pub fn import_ktx<E: TilingEngine + ?Sized>(
    engine: &E,
    data: &[u8],
    options: &ImportOptions,
) -> Result<Texture> {
    let (header, endian) = KtxHeader::parse(data)?;

    if header.pixel_depth > 1 {
        return Err(Error::UnsupportedFeature("3D textures"));
    }
    if header.number_of_faces != 1 || header.number_of_array_elements != 0 {
        return Err(Error::UnsupportedFeature("cube maps and array textures"));
    }
    if header.number_of_mipmap_levels == 0 {
        return Err(Error::InvalidHeader(
            "file must hold at least one mip level".to_owned(),
        ));
    }

    let mut format = format_from_gl(header.gl_internal_format, header.gl_base_internal_format)
        .ok_or(Error::UnrecognizedFormat {
            internal: header.gl_internal_format,
            base: header.gl_base_internal_format,
        })?;
    if options.srgb {
        format = format.to_srgb().unwrap_or(format);
    }

    if options.comp_sel.channels().iter().any(Option::is_none) {
        return Err(Error::InvalidSelector(options.comp_sel.0));
    }

    let num_mips = import_mip_count(header.pixel_width, header.number_of_mipmap_levels);
    if num_mips < header.number_of_mipmap_levels {
        debug!(
            declared = header.number_of_mipmap_levels,
            kept = num_mips,
            "truncating KTX mip chain"
        );
    }

    let mut reader = BinaryReader::with_endian(data, endian);
    reader.seek(KtxHeader::FILE_HEADER_SIZE);
    let key_value_size = header.bytes_of_key_value_data as usize;
    if reader.remaining_bytes().len() < key_value_size {
        return Err(truncated("key/value data", key_value_size, &reader));
    }
    reader.advance(key_value_size);

    let mut image: &[u8] = &[];
    let mut mips = Vec::new();
    for level in 0..num_mips {
        let size = reader
            .read_u32()
            .map_err(|_| truncated("level size", 4, &reader))? as usize;
        let bytes = reader
            .read_bytes(size)
            .map_err(|_| truncated("level data", size, &reader))?;
        if level == 0 {
            image = bytes;
        } else {
            mips.extend_from_slice(bytes);
        }
        let padding = (4 - size % 4) % 4;
        reader.advance(padding.min(reader.remaining_bytes().len()));
    }

    debug!(
        width = header.pixel_width,
        height = header.pixel_height,
        mips = num_mips,
        format = %format,
        "importing KTX"
    );

    let source = LinearImage {
        width: header.pixel_width,
        height: header.pixel_height.max(1),
        num_mips,
        format,
        comp_sel: options.comp_sel,
        image,
        mips: &mips,
    };
    Ok(Texture::from_linear_2d(
        engine,
        &source,
        options.tile_mode,
        options.swizzle,
        options.gfd_v7,
    )?)
}

/// Check if a byte slice starts with the KTX 1.1 identifier.
pub fn is_ktx(data: &[u8]) -> bool {
    data.starts_with(&crate::KTX_IDENTIFIER)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::format::gl;
    use crate::header::KTX_ENDIANNESS;
    use gtx_common::{BinaryWriter, Endian};
    use gtx_gx2::testing::FlatTiling;
    use gtx_gx2::{CompSel, SurfaceFormat};

    /// A little-endian RGBA8 KTX file with the given level payload sizes.
    pub(crate) fn rgba8_file(width: u32, height: u32, level_sizes: &[usize]) -> Vec<u8> {
        let header = KtxHeader {
            endianness: KTX_ENDIANNESS,
            gl_type: gl::UNSIGNED_BYTE,
            gl_type_size: 1,
            gl_format: gl::RGBA,
            gl_internal_format: gl::RGBA8,
            gl_base_internal_format: gl::RGBA,
            pixel_width: width,
            pixel_height: height,
            pixel_depth: 0,
            number_of_array_elements: 0,
            number_of_faces: 1,
            number_of_mipmap_levels: level_sizes.len() as u32,
            bytes_of_key_value_data: 0,
        };
        let mut writer = BinaryWriter::new(Endian::Little);
        header.encode(&mut writer);
        for (level, &size) in level_sizes.iter().enumerate() {
            writer.write_u32(size as u32).unwrap();
            writer.write_bytes(&vec![level as u8 + 1; size]);
            writer.write_zeros((4 - size % 4) % 4);
        }
        writer.into_inner()
    }

    #[test]
    fn test_mip_count_bounds() {
        assert_eq!(import_mip_count(256, 9), 8);
        assert_eq!(import_mip_count(256, 3), 3);
        assert_eq!(import_mip_count(1, 1), 1);
        assert_eq!(import_mip_count(1 << 20, 20), 13);
    }

    #[test]
    fn test_import_two_levels() {
        let data = rgba8_file(4, 4, &[64, 16]);
        assert!(is_ktx(&data));
        let texture = import_ktx(&FlatTiling, &data, &ImportOptions::default()).unwrap();
        assert_eq!(texture.surface.format, SurfaceFormat::UNORM_RGBA8);
        assert_eq!(texture.surface.num_mips, 2);
        assert_eq!(texture.view_num_mips, 2);
        assert_eq!(texture.surface.image.as_deref(), Some(&[1u8; 64][..]));
        assert_eq!(texture.surface.mips.as_deref(), Some(&[2u8; 16][..]));
    }

    #[test]
    fn test_import_truncates_mips() {
        // 4 pixels wide allows two levels
        let data = rgba8_file(4, 4, &[64, 16, 4]);
        let texture = import_ktx(&FlatTiling, &data, &ImportOptions::default()).unwrap();
        assert_eq!(texture.surface.num_mips, 2);
    }

    #[test]
    fn test_import_srgb() {
        let data = rgba8_file(2, 2, &[16]);
        let options = ImportOptions::default().with_srgb(true);
        let texture = import_ktx(&FlatTiling, &data, &options).unwrap();
        assert_eq!(texture.surface.format, SurfaceFormat::SRGB_RGBA8);
    }

    #[test]
    fn test_rejects_cube_and_volume() {
        let mut data = rgba8_file(4, 4, &[64]);
        // number_of_faces
        data[52..56].copy_from_slice(&6u32.to_le_bytes());
        assert!(matches!(
            import_ktx(&FlatTiling, &data, &ImportOptions::default()),
            Err(Error::UnsupportedFeature(_))
        ));

        let mut data = rgba8_file(4, 4, &[64]);
        // pixel_depth
        data[44..48].copy_from_slice(&4u32.to_le_bytes());
        assert!(matches!(
            import_ktx(&FlatTiling, &data, &ImportOptions::default()),
            Err(Error::UnsupportedFeature("3D textures"))
        ));
    }

    #[test]
    fn test_rejects_unknown_format() {
        let mut data = rgba8_file(4, 4, &[64]);
        data[28..32].copy_from_slice(&0x1234u32.to_le_bytes());
        data[32..36].copy_from_slice(&0x5678u32.to_le_bytes());
        assert!(matches!(
            import_ktx(&FlatTiling, &data, &ImportOptions::default()),
            Err(Error::UnrecognizedFormat {
                internal: 0x1234,
                base: 0x5678
            })
        ));
    }

    #[test]
    fn test_truncated_level() {
        let mut data = rgba8_file(4, 4, &[64]);
        data.truncate(data.len() - 8);
        assert!(matches!(
            import_ktx(&FlatTiling, &data, &ImportOptions::default()),
            Err(Error::Truncated {
                what: "level data",
                needed: 64,
                available: 56
            })
        ));
    }

    #[test]
    fn test_rejects_selector_template() {
        let data = rgba8_file(4, 4, &[64]);
        let options = ImportOptions::default().with_comp_sel(CompSel(0x0001_0207));
        assert!(matches!(
            import_ktx(&FlatTiling, &data, &options),
            Err(Error::InvalidSelector(0x0001_0207))
        ));
    }
}
