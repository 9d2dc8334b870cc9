//! Mapping between GL format enums and GX2 surface formats.

use gtx_gx2::SurfaceFormat;

/// GL enum values used in KTX headers.
pub mod gl {
    pub const BYTE: u32 = 0x1400;
    pub const UNSIGNED_BYTE: u32 = 0x1401;
    pub const SHORT: u32 = 0x1402;
    pub const UNSIGNED_SHORT: u32 = 0x1403;
    pub const INT: u32 = 0x1404;
    pub const UNSIGNED_INT: u32 = 0x1405;
    pub const FLOAT: u32 = 0x1406;
    pub const HALF_FLOAT: u32 = 0x140B;
    pub const UNSIGNED_SHORT_4_4_4_4: u32 = 0x8033;
    pub const UNSIGNED_SHORT_5_5_5_1: u32 = 0x8034;
    pub const UNSIGNED_SHORT_5_6_5: u32 = 0x8363;
    pub const UNSIGNED_INT_2_10_10_10_REV: u32 = 0x8368;
    pub const UNSIGNED_INT_24_8: u32 = 0x84FA;
    pub const UNSIGNED_INT_10F_11F_11F_REV: u32 = 0x8C3B;

    pub const RED: u32 = 0x1903;
    pub const RGB: u32 = 0x1907;
    pub const RGBA: u32 = 0x1908;
    pub const RG: u32 = 0x8227;
    pub const RG_INTEGER: u32 = 0x8228;
    pub const DEPTH_STENCIL: u32 = 0x84F9;
    pub const RED_INTEGER: u32 = 0x8D94;
    pub const RGBA_INTEGER: u32 = 0x8D99;

    pub const RGBA4: u32 = 0x8056;
    pub const RGB5_A1: u32 = 0x8057;
    pub const RGBA8: u32 = 0x8058;
    pub const RGB10_A2: u32 = 0x8059;
    pub const RGBA16: u32 = 0x805B;
    pub const R8: u32 = 0x8229;
    pub const R16: u32 = 0x822A;
    pub const RG8: u32 = 0x822B;
    pub const RG16: u32 = 0x822C;
    pub const R16F: u32 = 0x822D;
    pub const R32F: u32 = 0x822E;
    pub const RG16F: u32 = 0x822F;
    pub const RG32F: u32 = 0x8230;
    pub const R8I: u32 = 0x8231;
    pub const R8UI: u32 = 0x8232;
    pub const R16I: u32 = 0x8233;
    pub const R16UI: u32 = 0x8234;
    pub const R32I: u32 = 0x8235;
    pub const R32UI: u32 = 0x8236;
    pub const RG8I: u32 = 0x8237;
    pub const RG8UI: u32 = 0x8238;
    pub const RG16I: u32 = 0x8239;
    pub const RG16UI: u32 = 0x823A;
    pub const RG32I: u32 = 0x823B;
    pub const RG32UI: u32 = 0x823C;
    pub const RGBA32F: u32 = 0x8814;
    pub const RGBA16F: u32 = 0x881A;
    pub const DEPTH24_STENCIL8: u32 = 0x88F0;
    pub const R11F_G11F_B10F: u32 = 0x8C3A;
    pub const SRGB8_ALPHA8: u32 = 0x8C43;
    pub const RGB565: u32 = 0x8D62;
    pub const RGBA32UI: u32 = 0x8D70;
    pub const RGBA16UI: u32 = 0x8D76;
    pub const RGBA8UI: u32 = 0x8D7C;
    pub const RGBA32I: u32 = 0x8D82;
    pub const RGBA16I: u32 = 0x8D88;
    pub const RGBA8I: u32 = 0x8D8E;
    pub const R8_SNORM: u32 = 0x8F94;
    pub const RG8_SNORM: u32 = 0x8F95;
    pub const RGBA8_SNORM: u32 = 0x8F97;
    pub const R16_SNORM: u32 = 0x8F98;
    pub const RG16_SNORM: u32 = 0x8F99;
    pub const RGBA16_SNORM: u32 = 0x8F9B;
    pub const RGB10_A2UI: u32 = 0x906F;

    pub const COMPRESSED_RGB_S3TC_DXT1: u32 = 0x83F0;
    pub const COMPRESSED_RGBA_S3TC_DXT1: u32 = 0x83F1;
    pub const COMPRESSED_RGBA_S3TC_DXT3: u32 = 0x83F2;
    pub const COMPRESSED_RGBA_S3TC_DXT5: u32 = 0x83F3;
    pub const COMPRESSED_SRGB_S3TC_DXT1: u32 = 0x8C4C;
    pub const COMPRESSED_SRGB_ALPHA_S3TC_DXT1: u32 = 0x8C4D;
    pub const COMPRESSED_SRGB_ALPHA_S3TC_DXT3: u32 = 0x8C4E;
    pub const COMPRESSED_SRGB_ALPHA_S3TC_DXT5: u32 = 0x8C4F;
    pub const COMPRESSED_RED_RGTC1: u32 = 0x8DBB;
    pub const COMPRESSED_SIGNED_RED_RGTC1: u32 = 0x8DBC;
    pub const COMPRESSED_RG_RGTC2: u32 = 0x8DBD;
    pub const COMPRESSED_SIGNED_RG_RGTC2: u32 = 0x8DBE;
}

/// GL description of a surface format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlFormat {
    pub format: SurfaceFormat,
    pub internal: u32,
    pub base: u32,
    /// Zero for block-compressed formats.
    pub gl_type: u32,
    pub type_size: u32,
}

const fn entry(format: SurfaceFormat, internal: u32, base: u32, gl_type: u32, type_size: u32) -> GlFormat {
    GlFormat {
        format,
        internal,
        base,
        gl_type,
        type_size,
    }
}

const fn compressed(format: SurfaceFormat, internal: u32, base: u32) -> GlFormat {
    entry(format, internal, base, 0, 1)
}

/// Lookup table. The first entry for a surface format is the one written on
/// export.
const GL_FORMATS: &[GlFormat] = &[
    entry(SurfaceFormat::UNORM_R8, gl::R8, gl::RED, gl::UNSIGNED_BYTE, 1),
    entry(SurfaceFormat::UNORM_R16, gl::R16, gl::RED, gl::UNSIGNED_SHORT, 2),
    entry(SurfaceFormat::UNORM_RG8, gl::RG8, gl::RG, gl::UNSIGNED_BYTE, 1),
    entry(SurfaceFormat::UNORM_RG16, gl::RG16, gl::RG, gl::UNSIGNED_SHORT, 2),
    entry(SurfaceFormat::UNORM_RGB565, gl::RGB565, gl::RGB, gl::UNSIGNED_SHORT_5_6_5, 2),
    entry(SurfaceFormat::UNORM_RGB5A1, gl::RGB5_A1, gl::RGBA, gl::UNSIGNED_SHORT_5_5_5_1, 2),
    entry(SurfaceFormat::UNORM_RGBA4, gl::RGBA4, gl::RGBA, gl::UNSIGNED_SHORT_4_4_4_4, 2),
    entry(SurfaceFormat::UNORM_RGB10A2, gl::RGB10_A2, gl::RGBA, gl::UNSIGNED_INT_2_10_10_10_REV, 4),
    entry(SurfaceFormat::UNORM_RGBA8, gl::RGBA8, gl::RGBA, gl::UNSIGNED_BYTE, 1),
    entry(SurfaceFormat::UNORM_RGBA16, gl::RGBA16, gl::RGBA, gl::UNSIGNED_SHORT, 2),
    entry(SurfaceFormat::UNORM_R24_X8, gl::DEPTH24_STENCIL8, gl::DEPTH_STENCIL, gl::UNSIGNED_INT_24_8, 4),
    entry(SurfaceFormat::UINT_R8, gl::R8UI, gl::RED_INTEGER, gl::UNSIGNED_BYTE, 1),
    entry(SurfaceFormat::UINT_R16, gl::R16UI, gl::RED_INTEGER, gl::UNSIGNED_SHORT, 2),
    entry(SurfaceFormat::UINT_R32, gl::R32UI, gl::RED_INTEGER, gl::UNSIGNED_INT, 4),
    entry(SurfaceFormat::UINT_RG8, gl::RG8UI, gl::RG_INTEGER, gl::UNSIGNED_BYTE, 1),
    entry(SurfaceFormat::UINT_RG16, gl::RG16UI, gl::RG_INTEGER, gl::UNSIGNED_SHORT, 2),
    entry(SurfaceFormat::UINT_RG32, gl::RG32UI, gl::RG_INTEGER, gl::UNSIGNED_INT, 4),
    entry(SurfaceFormat::UINT_RGB10A2, gl::RGB10_A2UI, gl::RGBA_INTEGER, gl::UNSIGNED_INT_2_10_10_10_REV, 4),
    entry(SurfaceFormat::UINT_RGBA8, gl::RGBA8UI, gl::RGBA_INTEGER, gl::UNSIGNED_BYTE, 1),
    entry(SurfaceFormat::UINT_RGBA16, gl::RGBA16UI, gl::RGBA_INTEGER, gl::UNSIGNED_SHORT, 2),
    entry(SurfaceFormat::UINT_RGBA32, gl::RGBA32UI, gl::RGBA_INTEGER, gl::UNSIGNED_INT, 4),
    entry(SurfaceFormat::SINT_R8, gl::R8I, gl::RED_INTEGER, gl::BYTE, 1),
    entry(SurfaceFormat::SINT_R16, gl::R16I, gl::RED_INTEGER, gl::SHORT, 2),
    entry(SurfaceFormat::SINT_R32, gl::R32I, gl::RED_INTEGER, gl::INT, 4),
    entry(SurfaceFormat::SINT_RG8, gl::RG8I, gl::RG_INTEGER, gl::BYTE, 1),
    entry(SurfaceFormat::SINT_RG16, gl::RG16I, gl::RG_INTEGER, gl::SHORT, 2),
    entry(SurfaceFormat::SINT_RG32, gl::RG32I, gl::RG_INTEGER, gl::INT, 4),
    entry(SurfaceFormat::SINT_RGBA8, gl::RGBA8I, gl::RGBA_INTEGER, gl::BYTE, 1),
    entry(SurfaceFormat::SINT_RGBA16, gl::RGBA16I, gl::RGBA_INTEGER, gl::SHORT, 2),
    entry(SurfaceFormat::SINT_RGBA32, gl::RGBA32I, gl::RGBA_INTEGER, gl::INT, 4),
    entry(SurfaceFormat::SNORM_R8, gl::R8_SNORM, gl::RED, gl::BYTE, 1),
    entry(SurfaceFormat::SNORM_RG8, gl::RG8_SNORM, gl::RG, gl::BYTE, 1),
    entry(SurfaceFormat::SNORM_RGBA8, gl::RGBA8_SNORM, gl::RGBA, gl::BYTE, 1),
    entry(SurfaceFormat::SNORM_R16, gl::R16_SNORM, gl::RED, gl::SHORT, 2),
    entry(SurfaceFormat::SNORM_RG16, gl::RG16_SNORM, gl::RG, gl::SHORT, 2),
    entry(SurfaceFormat::SNORM_RGBA16, gl::RGBA16_SNORM, gl::RGBA, gl::SHORT, 2),
    entry(SurfaceFormat::SRGB_RGBA8, gl::SRGB8_ALPHA8, gl::RGBA, gl::UNSIGNED_BYTE, 1),
    entry(SurfaceFormat::FLOAT_R16, gl::R16F, gl::RED, gl::HALF_FLOAT, 2),
    entry(SurfaceFormat::FLOAT_R32, gl::R32F, gl::RED, gl::FLOAT, 4),
    entry(SurfaceFormat::FLOAT_RG16, gl::RG16F, gl::RG, gl::HALF_FLOAT, 2),
    entry(SurfaceFormat::FLOAT_RG32, gl::RG32F, gl::RG, gl::FLOAT, 4),
    entry(SurfaceFormat::FLOAT_RGBA16, gl::RGBA16F, gl::RGBA, gl::HALF_FLOAT, 2),
    entry(SurfaceFormat::FLOAT_RGBA32, gl::RGBA32F, gl::RGBA, gl::FLOAT, 4),
    entry(SurfaceFormat::FLOAT_RG11B10, gl::R11F_G11F_B10F, gl::RGB, gl::UNSIGNED_INT_10F_11F_11F_REV, 4),
    compressed(SurfaceFormat::UNORM_BC1, gl::COMPRESSED_RGBA_S3TC_DXT1, gl::RGBA),
    compressed(SurfaceFormat::UNORM_BC1, gl::COMPRESSED_RGB_S3TC_DXT1, gl::RGB),
    compressed(SurfaceFormat::UNORM_BC2, gl::COMPRESSED_RGBA_S3TC_DXT3, gl::RGBA),
    compressed(SurfaceFormat::UNORM_BC3, gl::COMPRESSED_RGBA_S3TC_DXT5, gl::RGBA),
    compressed(SurfaceFormat::UNORM_BC4, gl::COMPRESSED_RED_RGTC1, gl::RED),
    compressed(SurfaceFormat::SNORM_BC4, gl::COMPRESSED_SIGNED_RED_RGTC1, gl::RED),
    compressed(SurfaceFormat::UNORM_BC5, gl::COMPRESSED_RG_RGTC2, gl::RG),
    compressed(SurfaceFormat::SNORM_BC5, gl::COMPRESSED_SIGNED_RG_RGTC2, gl::RG),
    compressed(SurfaceFormat::SRGB_BC1, gl::COMPRESSED_SRGB_ALPHA_S3TC_DXT1, gl::RGBA),
    compressed(SurfaceFormat::SRGB_BC1, gl::COMPRESSED_SRGB_S3TC_DXT1, gl::RGB),
    compressed(SurfaceFormat::SRGB_BC2, gl::COMPRESSED_SRGB_ALPHA_S3TC_DXT3, gl::RGBA),
    compressed(SurfaceFormat::SRGB_BC3, gl::COMPRESSED_SRGB_ALPHA_S3TC_DXT5, gl::RGBA),
];

/// Formats assumed when only an unsized base format is recognized.
const BASE_FALLBACK: &[(u32, SurfaceFormat)] = &[
    (gl::RED, SurfaceFormat::UNORM_R8),
    (gl::RG, SurfaceFormat::UNORM_RG8),
    (gl::RGBA, SurfaceFormat::UNORM_RGBA8),
];

/// Pick a surface format for a GL internal/base format pair.
///
/// The sized internal format wins. Files that store a sized format in the
/// base field are matched next, then bare base formats.
pub fn format_from_gl(internal: u32, base: u32) -> Option<SurfaceFormat> {
    let sized = |value| GL_FORMATS.iter().find(|f| f.internal == value).map(|f| f.format);
    sized(internal).or_else(|| sized(base)).or_else(|| {
        BASE_FALLBACK
            .iter()
            .find(|(value, _)| *value == base)
            .map(|(_, format)| *format)
    })
}

/// GL description written for a surface format.
pub fn gl_format(format: SurfaceFormat) -> Option<GlFormat> {
    GL_FORMATS.iter().find(|f| f.format == format).copied()
}
