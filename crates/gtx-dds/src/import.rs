//! DDS to GX2 texture import.

use gtx_gx2::{CompSel, ImportOptions, LinearImage, SurfaceFormat, Texture, TilingEngine};
use tracing::debug;

use crate::header::{pixel_flags, DdsHeader, FourCC};
use crate::{Error, Result};

/// Source channel mapping: red, green, blue, alpha, then the Zero and One
/// constants. Each entry is a channel index.
pub type ChannelMapping = [u8; 6];

const ZERO: u8 = 4;
const ONE: u8 = 5;

/// Uncompressed candidate formats with their channel masks, searched in order.
/// A zero mask ends a format's channel list.
const CANDIDATES_8: &[(SurfaceFormat, [u32; 4])] = &[
    (SurfaceFormat::UNORM_R8, [0x0000_00FF, 0, 0, 0]),
    (SurfaceFormat::UNORM_RG4, [0x0000_000F, 0x0000_00F0, 0, 0]),
];

const CANDIDATES_16: &[(SurfaceFormat, [u32; 4])] = &[
    (SurfaceFormat::UNORM_RG8, [0x0000_00FF, 0x0000_FF00, 0, 0]),
    (SurfaceFormat::UNORM_RGB565, [0x0000_001F, 0x0000_07E0, 0x0000_F800, 0]),
    (
        SurfaceFormat::UNORM_RGB5A1,
        [0x0000_001F, 0x0000_03E0, 0x0000_7C00, 0x0000_8000],
    ),
    (
        SurfaceFormat::UNORM_RGBA4,
        [0x0000_000F, 0x0000_00F0, 0x0000_0F00, 0x0000_F000],
    ),
];

const CANDIDATES_32: &[(SurfaceFormat, [u32; 4])] = &[
    (
        SurfaceFormat::UNORM_RGB10A2,
        [0x3FF0_0000, 0x000F_FC00, 0x0000_03FF, 0xC000_0000],
    ),
    (
        SurfaceFormat::UNORM_RGBA8,
        [0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0xFF00_0000],
    ),
];

/// Native format decided for a DDS file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedFormat {
    pub format: SurfaceFormat,
    pub mapping: ChannelMapping,
    /// Byte size of level 0.
    pub image_size: usize,
    /// Bytes per 4x4 block for compressed formats.
    pub block_size: Option<u32>,
}

/// Index of `mask` within `masks`, stopping at the first zero entry.
fn find_mask(mask: u32, masks: &[u32; 4]) -> Option<u8> {
    masks
        .iter()
        .take_while(|&&m| m != 0)
        .position(|&m| m == mask)
        .map(|i| i as u8)
}

/// Product of the factors as a byte count, rejecting headers whose level 0
/// cannot be addressed.
fn level_size(factors: &[u32]) -> Result<usize> {
    factors
        .iter()
        .try_fold(1usize, |size, &factor| size.checked_mul(factor as usize))
        .ok_or_else(|| Error::InvalidHeader("image size overflows".to_owned()))
}

fn detect_uncompressed(header: &DdsHeader, srgb: bool) -> Result<DetectedFormat> {
    let pf = &header.pixel_format;
    let bpp = pf.rgb_bit_count;
    let candidates = match bpp {
        8 => CANDIDATES_8,
        16 => CANDIDATES_16,
        32 => CANDIDATES_32,
        _ => {
            return Err(Error::UnrecognizedFormat(format!(
                "{bpp} bits per pixel"
            )))
        }
    };

    let alpha_only = pf.has_flags(pixel_flags::ALPHA);
    let has_alpha = pf.has_flags(pixel_flags::ALPHA_PIXELS);
    let rgb = pf.has_flags(pixel_flags::RGB);

    let (r, g, b, a) = (pf.r_bit_mask, pf.g_bit_mask, pf.b_bit_mask, pf.a_bit_mask);
    let found = candidates.iter().find_map(|(format, masks)| {
        let find = |mask| find_mask(mask, masks);
        let mapping = if alpha_only {
            let a = find(a)?;
            [ONE, ONE, ONE, a]
        } else if has_alpha && rgb {
            [find(r)?, find(g)?, find(b)?, find(a)?]
        } else if has_alpha {
            let r = find(r)?;
            [r, r, r, find(a)?]
        } else if rgb {
            [find(r)?, find(g)?, find(b)?, ONE]
        } else {
            let r = find(r)?;
            [r, r, r, ONE]
        };
        Some((*format, mapping))
    });

    let Some((mut format, [r, g, b, a])) = found else {
        return Err(Error::UnrecognizedFormat(format!(
            "{bpp}-bit masks r={r:#x} g={g:#x} b={b:#x} a={a:#x} flags={:#x}",
            pf.flags
        )));
    };

    if srgb {
        format = format.to_srgb().unwrap_or(format);
    }

    let image_size = level_size(&[header.width, header.height, bpp >> 3])?;
    Ok(DetectedFormat {
        format,
        mapping: [r, g, b, a, ZERO, ONE],
        image_size,
        block_size: None,
    })
}

fn detect_compressed(header: &DdsHeader, srgb: bool) -> Result<DetectedFormat> {
    let four_cc = header.pixel_format.four_cc;
    let (mut format, block_size) = match four_cc {
        FourCC::DXT1 => (SurfaceFormat::UNORM_BC1, 8),
        FourCC::DXT2 | FourCC::DXT3 => (SurfaceFormat::UNORM_BC2, 16),
        FourCC::DXT4 | FourCC::DXT5 => (SurfaceFormat::UNORM_BC3, 16),
        FourCC::ATI1 | FourCC::BC4U => (SurfaceFormat::UNORM_BC4, 8),
        FourCC::BC4S => (SurfaceFormat::SNORM_BC4, 8),
        FourCC::ATI2 | FourCC::BC5U => (SurfaceFormat::UNORM_BC5, 16),
        FourCC::BC5S => (SurfaceFormat::SNORM_BC5, 16),
        other => return Err(Error::UnrecognizedFormat(format!("FourCC {other}"))),
    };

    // block formats cannot carry their own channel masks
    let mapping = match format.hardware() {
        0x31..=0x33 => {
            if srgb {
                format = format.to_srgb().unwrap_or(format);
            }
            [0, 1, 2, 3, ZERO, ONE]
        }
        0x34 => [0, ZERO, ZERO, ONE, ZERO, ONE],
        _ => [0, 1, ZERO, ONE, ZERO, ONE],
    };

    let image_size = level_size(&[
        header.width.div_ceil(4),
        header.height.div_ceil(4),
        block_size,
    ])?;
    Ok(DetectedFormat {
        format,
        mapping,
        image_size,
        block_size: Some(block_size),
    })
}

/// Reject layouts the importer cannot represent as a single 2D texture.
pub fn check_supported(header: &DdsHeader) -> Result<()> {
    if header.is_volume() {
        return Err(Error::UnsupportedFeature("volume textures"));
    }
    if header.is_cubemap() {
        return Err(Error::UnsupportedFeature("cube maps"));
    }
    if header.pixel_format.has_flags(pixel_flags::YUV) {
        return Err(Error::UnsupportedFeature("YUV color space"));
    }
    if header.is_dx10() {
        return Err(Error::UnsupportedFeature("DX10 headers"));
    }
    Ok(())
}

/// Decide the native format, channel mapping and level 0 size of a DDS file.
pub fn detect_format(header: &DdsHeader, srgb: bool) -> Result<DetectedFormat> {
    check_supported(header)?;
    if header.pixel_format.has_flags(pixel_flags::FOUR_CC) {
        detect_compressed(header, srgb)
    } else {
        detect_uncompressed(header, srgb)
    }
}

/// Build a selector word by looking up each byte of `template` in `mapping`.
pub fn compose_selectors(mapping: &ChannelMapping, template: CompSel) -> Result<CompSel> {
    let mut out = [0u8; 4];
    for (dst, index) in out.iter_mut().zip(template.indices()) {
        *dst = *mapping
            .get(index as usize)
            .ok_or(Error::InvalidSelector(template.0))?;
    }
    Ok(CompSel(u32::from_be_bytes(out)))
}

/// Import a DDS file as a tiled GX2 texture.
///
/// Level 0 starts right after the header. Everything after level 0 is taken
/// as the mip chain.
pub fn import_dds<E: TilingEngine + ?Sized>(
    engine: &E,
    data: &[u8],
    options: &ImportOptions,
) -> Result<Texture> {
    let header = DdsHeader::parse(data)?;
    let detected = detect_format(&header, options.srgb)?;

    let mip_start = DdsHeader::DATA_OFFSET.saturating_add(detected.image_size);
    if data.len() < mip_start {
        return Err(Error::Truncated {
            needed: mip_start,
            available: data.len(),
        });
    }
    let image = &data[DdsHeader::DATA_OFFSET..mip_start];
    let mips = &data[mip_start..];
    let comp_sel = compose_selectors(&detected.mapping, options.comp_sel)?;

    debug!(
        width = header.width,
        height = header.height,
        mips = header.mipmap_count,
        format = %detected.format,
        comp_sel = %comp_sel,
        "importing DDS"
    );

    let source = LinearImage {
        width: header.width,
        height: header.height,
        num_mips: header.mipmap_count,
        format: detected.format,
        comp_sel,
        image,
        mips,
    };
    Ok(Texture::from_linear_2d(
        engine,
        &source,
        options.tile_mode,
        options.swizzle,
        options.gfd_v7,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::caps2;
    use gtx_gx2::testing::FlatTiling;
    use gtx_gx2::{Channel, TileMode};

    struct DdsBuilder {
        width: u32,
        height: u32,
        mips: u32,
        flags: u32,
        four_cc: [u8; 4],
        bpp: u32,
        masks: [u32; 4],
        caps2: u32,
    }

    impl DdsBuilder {
        fn rgb(bpp: u32, masks: [u32; 4], flags: u32) -> Self {
            Self {
                width: 4,
                height: 4,
                mips: 1,
                flags,
                four_cc: [0; 4],
                bpp,
                masks,
                caps2: 0,
            }
        }

        fn compressed(four_cc: &[u8; 4]) -> Self {
            Self {
                flags: pixel_flags::FOUR_CC,
                four_cc: *four_cc,
                ..Self::rgb(0, [0; 4], 0)
            }
        }

        fn build(&self, payload: usize) -> Vec<u8> {
            let mut words = [0u32; 31];
            words[0] = 124;
            words[2] = self.height;
            words[3] = self.width;
            words[6] = self.mips;
            words[18] = 32;
            words[19] = self.flags;
            words[21] = self.bpp;
            words[22..26].copy_from_slice(&self.masks);
            words[27] = self.caps2;

            let mut data = b"DDS ".to_vec();
            for (i, word) in words.iter().enumerate() {
                if i == 20 {
                    data.extend_from_slice(&self.four_cc);
                } else {
                    data.extend_from_slice(&word.to_le_bytes());
                }
            }
            data.extend((0..payload).map(|i| i as u8));
            data
        }
    }

    #[test]
    fn test_find_mask_stops_at_zero() {
        assert_eq!(find_mask(0xFF00, &[0xFF, 0xFF00, 0, 0]), Some(1));
        assert_eq!(find_mask(0, &[0xFF, 0, 0, 0]), None);
        assert_eq!(find_mask(0xF000, &[0xF, 0, 0xF000, 0]), None);
    }

    #[test]
    fn test_rgb_masks_without_alpha() {
        let data = DdsBuilder::rgb(32, [0xFF, 0xFF00, 0xFF_0000, 0], pixel_flags::RGB).build(64);
        let header = DdsHeader::parse(&data).unwrap();
        let detected = detect_format(&header, false).unwrap();
        assert_eq!(detected.format, SurfaceFormat::UNORM_RGBA8);
        assert_eq!(detected.mapping, [0, 1, 2, ONE, ZERO, ONE]);
        assert_eq!(detected.image_size, 64);

        let texture = import_dds(&FlatTiling, &data, &ImportOptions::default()).unwrap();
        assert_eq!(
            texture.comp_sel.channels(),
            [
                Some(Channel::Red),
                Some(Channel::Green),
                Some(Channel::Blue),
                Some(Channel::One)
            ]
        );
        assert_eq!(texture.surface.image.as_deref(), Some(&data[128..]));
    }

    #[test]
    fn test_dxt5() {
        let data = DdsBuilder::compressed(b"DXT5").build(16);
        let header = DdsHeader::parse(&data).unwrap();
        let detected = detect_format(&header, false).unwrap();
        assert_eq!(detected.format, SurfaceFormat::UNORM_BC3);
        assert_eq!(detected.block_size, Some(16));
        assert_eq!(detected.mapping, [0, 1, 2, 3, ZERO, ONE]);

        let texture = import_dds(&FlatTiling, &data, &ImportOptions::default()).unwrap();
        assert_eq!(texture.comp_sel, CompSel::RGBA);
        assert_eq!(texture.surface.format, SurfaceFormat::UNORM_BC3);
        assert_eq!(texture.surface.tile_mode, TileMode::Tiled2DThin1);
    }

    #[test]
    fn test_srgb_promotion() {
        let data = DdsBuilder::compressed(b"DXT1").build(8);
        let header = DdsHeader::parse(&data).unwrap();
        assert_eq!(detect_format(&header, true).unwrap().format, SurfaceFormat::SRGB_BC1);

        let data = DdsBuilder::compressed(b"BC4S").build(8);
        let header = DdsHeader::parse(&data).unwrap();
        let detected = detect_format(&header, true).unwrap();
        assert_eq!(detected.format, SurfaceFormat::SNORM_BC4);
        assert_eq!(detected.mapping, [0, ZERO, ZERO, ONE, ZERO, ONE]);
    }

    #[test]
    fn test_luminance_alpha() {
        let data = DdsBuilder::rgb(16, [0xFF, 0, 0, 0xFF00], pixel_flags::ALPHA_PIXELS).build(32);
        let header = DdsHeader::parse(&data).unwrap();
        let detected = detect_format(&header, false).unwrap();
        assert_eq!(detected.format, SurfaceFormat::UNORM_RG8);
        assert_eq!(detected.mapping, [0, 0, 0, 1, ZERO, ONE]);
    }

    #[test]
    fn test_alpha_only() {
        let data = DdsBuilder::rgb(8, [0, 0, 0, 0xFF], pixel_flags::ALPHA).build(16);
        let header = DdsHeader::parse(&data).unwrap();
        let detected = detect_format(&header, false).unwrap();
        assert_eq!(detected.format, SurfaceFormat::UNORM_R8);
        assert_eq!(detected.mapping, [ONE, ONE, ONE, 0, ZERO, ONE]);
    }

    #[test]
    fn test_rgb565_over_rgb5a1() {
        let data =
            DdsBuilder::rgb(16, [0xF800, 0x7E0, 0x1F, 0], pixel_flags::RGB).build(32);
        let header = DdsHeader::parse(&data).unwrap();
        let detected = detect_format(&header, false).unwrap();
        assert_eq!(detected.format, SurfaceFormat::UNORM_RGB565);
        assert_eq!(detected.mapping, [2, 1, 0, ONE, ZERO, ONE]);
    }

    #[test]
    fn test_unrecognized_masks() {
        let data = DdsBuilder::rgb(24, [0xFF, 0xFF00, 0xFF_0000, 0], pixel_flags::RGB).build(48);
        let header = DdsHeader::parse(&data).unwrap();
        assert!(matches!(
            detect_format(&header, false),
            Err(Error::UnrecognizedFormat(_))
        ));

        let data = DdsBuilder::compressed(b"ETC1").build(8);
        let header = DdsHeader::parse(&data).unwrap();
        assert!(matches!(
            detect_format(&header, false),
            Err(Error::UnrecognizedFormat(_))
        ));
    }

    #[test]
    fn test_rejects_unsupported_layouts() {
        let mut builder = DdsBuilder::compressed(b"DXT1");
        builder.caps2 = caps2::CUBEMAP | caps2::CUBEMAP_POSITIVE_X;
        let header = DdsHeader::parse(&builder.build(8)).unwrap();
        assert!(matches!(
            detect_format(&header, false),
            Err(Error::UnsupportedFeature("cube maps"))
        ));

        builder.caps2 = caps2::VOLUME;
        let header = DdsHeader::parse(&builder.build(8)).unwrap();
        assert!(matches!(
            detect_format(&header, false),
            Err(Error::UnsupportedFeature("volume textures"))
        ));

        let header = DdsHeader::parse(&DdsBuilder::compressed(b"DX10").build(8)).unwrap();
        assert!(matches!(
            detect_format(&header, false),
            Err(Error::UnsupportedFeature("DX10 headers"))
        ));
    }

    #[test]
    fn test_truncated_level() {
        let data = DdsBuilder::compressed(b"DXT5").build(8);
        assert!(matches!(
            import_dds(&FlatTiling, &data, &ImportOptions::default()),
            Err(Error::Truncated {
                needed: 144,
                available: 136
            })
        ));
    }

    #[test]
    fn test_oversized_dimensions() {
        let mut builder = DdsBuilder::compressed(b"DXT5");
        builder.width = u32::MAX;
        builder.height = u32::MAX;
        let header = DdsHeader::parse(&builder.build(0)).unwrap();
        assert!(matches!(
            detect_format(&header, false),
            Err(Error::InvalidHeader(_))
        ));

        let masks = [0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000];
        let mut builder =
            DdsBuilder::rgb(32, masks, pixel_flags::RGB | pixel_flags::ALPHA_PIXELS);
        builder.width = u32::MAX;
        builder.height = u32::MAX;
        let data = builder.build(0);
        let header = DdsHeader::parse(&data).unwrap();
        assert!(matches!(
            detect_format(&header, false),
            Err(Error::InvalidHeader(_))
        ));
        assert!(matches!(
            import_dds(&FlatTiling, &data, &ImportOptions::default()),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_compose_selectors() {
        let mapping = [0, 1, 2, ONE, ZERO, ONE];
        let sel = compose_selectors(&mapping, CompSel(0x0302_0100)).unwrap();
        assert_eq!(sel, CompSel(0x0502_0100));
        assert!(matches!(
            compose_selectors(&mapping, CompSel(0x0000_0009)),
            Err(Error::InvalidSelector(9))
        ));
    }
}
