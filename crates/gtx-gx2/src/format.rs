//! GX2 surface formats.
//!
//! A surface format is a hardware format code in the low six bits combined
//! with modifier flags:
//!
//! | bit     | meaning        |
//! |---------|----------------|
//! | `0x100` | integer        |
//! | `0x200` | signed         |
//! | `0x400` | sRGB (degamma) |
//! | `0x800` | floating point |

use std::fmt;

/// A GX2 surface format code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct SurfaceFormat(pub u32);

/// Hardware format codes that a depth buffer may use.
const DEPTH_HW_FORMATS: [u32; 4] = [0x05, 0x0E, 0x11, 0x1C];

impl SurfaceFormat {
    pub const INVALID: Self = Self(0x000);

    pub const UNORM_R8: Self = Self(0x001);
    pub const UNORM_RG4: Self = Self(0x002);
    pub const UNORM_R16: Self = Self(0x005);
    pub const UNORM_RG8: Self = Self(0x007);
    pub const UNORM_RGB565: Self = Self(0x008);
    pub const UNORM_RGB5A1: Self = Self(0x00A);
    pub const UNORM_RGBA4: Self = Self(0x00B);
    pub const UNORM_A1BGR5: Self = Self(0x00C);
    pub const UNORM_RG16: Self = Self(0x00F);
    pub const UNORM_R24_X8: Self = Self(0x011);
    pub const UNORM_RGB10A2: Self = Self(0x019);
    pub const UNORM_RGBA8: Self = Self(0x01A);
    pub const UNORM_A2BGR10: Self = Self(0x01B);
    pub const UNORM_RGBA16: Self = Self(0x01F);
    pub const UNORM_BC1: Self = Self(0x031);
    pub const UNORM_BC2: Self = Self(0x032);
    pub const UNORM_BC3: Self = Self(0x033);
    pub const UNORM_BC4: Self = Self(0x034);
    pub const UNORM_BC5: Self = Self(0x035);

    pub const UINT_R8: Self = Self(0x101);
    pub const UINT_R16: Self = Self(0x105);
    pub const UINT_RG8: Self = Self(0x107);
    pub const UINT_R32: Self = Self(0x10D);
    pub const UINT_RG16: Self = Self(0x10F);
    pub const UINT_RGB10A2: Self = Self(0x119);
    pub const UINT_RGBA8: Self = Self(0x11A);
    pub const UINT_RG32: Self = Self(0x11D);
    pub const UINT_RGBA16: Self = Self(0x11F);
    pub const UINT_RGBA32: Self = Self(0x122);

    pub const SNORM_R8: Self = Self(0x201);
    pub const SNORM_R16: Self = Self(0x205);
    pub const SNORM_RG8: Self = Self(0x207);
    pub const SNORM_RG16: Self = Self(0x20F);
    pub const SNORM_RGB10A2: Self = Self(0x219);
    pub const SNORM_RGBA8: Self = Self(0x21A);
    pub const SNORM_RGBA16: Self = Self(0x21F);
    pub const SNORM_BC4: Self = Self(0x234);
    pub const SNORM_BC5: Self = Self(0x235);

    pub const SINT_R8: Self = Self(0x301);
    pub const SINT_R16: Self = Self(0x305);
    pub const SINT_RG8: Self = Self(0x307);
    pub const SINT_R32: Self = Self(0x30D);
    pub const SINT_RG16: Self = Self(0x30F);
    pub const SINT_RGB10A2: Self = Self(0x319);
    pub const SINT_RGBA8: Self = Self(0x31A);
    pub const SINT_RG32: Self = Self(0x31D);
    pub const SINT_RGBA16: Self = Self(0x31F);
    pub const SINT_RGBA32: Self = Self(0x322);

    pub const SRGB_RGBA8: Self = Self(0x41A);
    pub const SRGB_BC1: Self = Self(0x431);
    pub const SRGB_BC2: Self = Self(0x432);
    pub const SRGB_BC3: Self = Self(0x433);

    pub const FLOAT_R16: Self = Self(0x806);
    pub const FLOAT_R32: Self = Self(0x80E);
    pub const FLOAT_RG16: Self = Self(0x810);
    pub const FLOAT_D24_S8: Self = Self(0x811);
    pub const FLOAT_RG11B10: Self = Self(0x816);
    pub const FLOAT_D32_UINT_S8_X24: Self = Self(0x81C);
    pub const FLOAT_RG32: Self = Self(0x81E);
    pub const FLOAT_RGBA16: Self = Self(0x820);
    pub const FLOAT_RGBA32: Self = Self(0x823);

    pub const UNORM_D16: Self = Self::UNORM_R16;
    pub const UNORM_D24_S8: Self = Self::UNORM_R24_X8;
    pub const FLOAT_D32: Self = Self::FLOAT_R32;

    /// The hardware format code (low six bits).
    #[inline]
    pub const fn hardware(self) -> u32 {
        self.0 & 0x3F
    }

    /// Check the integer modifier.
    #[inline]
    pub const fn is_int(self) -> bool {
        self.0 & 0x100 != 0
    }

    /// Check the signed modifier.
    #[inline]
    pub const fn is_signed(self) -> bool {
        self.0 & 0x200 != 0
    }

    /// Check the sRGB modifier.
    #[inline]
    pub const fn is_srgb(self) -> bool {
        self.0 & 0x400 != 0
    }

    /// Check the floating point modifier.
    #[inline]
    pub const fn is_float(self) -> bool {
        self.0 & 0x800 != 0
    }

    /// Check if the hardware format is block-compressed (BC1 to BC5).
    #[inline]
    pub const fn is_compressed(self) -> bool {
        matches!(self.hardware(), 0x31..=0x35)
    }

    /// Check if a depth buffer may use the hardware format.
    #[inline]
    pub fn is_depth_capable(self) -> bool {
        DEPTH_HW_FORMATS.contains(&self.hardware())
    }

    /// Width and height in pixels of one addressable element.
    #[inline]
    pub const fn block_dim(self) -> u32 {
        if self.is_compressed() {
            4
        } else {
            1
        }
    }

    /// Bits per element (per 4x4 block for compressed formats).
    ///
    /// Returns `None` for hardware formats that have no known layout.
    pub const fn bits_per_element(self) -> Option<u32> {
        Some(match self.hardware() {
            0x01 | 0x02 => 8,
            0x05..=0x08 | 0x0A..=0x0C => 16,
            0x0D..=0x11 | 0x16 | 0x19..=0x1B => 32,
            0x1C..=0x20 | 0x31 | 0x34 => 64,
            0x22 | 0x23 | 0x32 | 0x33 | 0x35 => 128,
            _ => return None,
        })
    }

    /// Check if the format has a known element layout.
    #[inline]
    pub const fn is_known(self) -> bool {
        self.bits_per_element().is_some()
    }

    /// The sRGB variant of this format, if one exists.
    pub const fn to_srgb(self) -> Option<Self> {
        match self {
            Self::UNORM_RGBA8 => Some(Self::SRGB_RGBA8),
            Self::UNORM_BC1 => Some(Self::SRGB_BC1),
            Self::UNORM_BC2 => Some(Self::SRGB_BC2),
            Self::UNORM_BC3 => Some(Self::SRGB_BC3),
            _ => None,
        }
    }

    /// Byte size of one mip level of the given pixel dimensions.
    ///
    /// `None` for unknown formats and for sizes that overflow `u64`.
    pub fn level_size(self, width: u32, height: u32) -> Option<u64> {
        let bits = u64::from(self.bits_per_element()?);
        let dim = self.block_dim();
        let blocks_x = u64::from(width.max(1).div_ceil(dim));
        let blocks_y = u64::from(height.max(1).div_ceil(dim));
        blocks_x.checked_mul(blocks_y)?.checked_mul(bits).map(|bits| bits / 8)
    }

    /// Symbolic name of the format, if it is one of the named constants.
    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::INVALID => "INVALID",
            Self::UNORM_R8 => "UNORM_R8",
            Self::UNORM_RG4 => "UNORM_RG4",
            Self::UNORM_R16 => "UNORM_R16",
            Self::UNORM_RG8 => "UNORM_RG8",
            Self::UNORM_RGB565 => "UNORM_RGB565",
            Self::UNORM_RGB5A1 => "UNORM_RGB5A1",
            Self::UNORM_RGBA4 => "UNORM_RGBA4",
            Self::UNORM_A1BGR5 => "UNORM_A1BGR5",
            Self::UNORM_RG16 => "UNORM_RG16",
            Self::UNORM_R24_X8 => "UNORM_R24_X8",
            Self::UNORM_RGB10A2 => "UNORM_RGB10A2",
            Self::UNORM_RGBA8 => "UNORM_RGBA8",
            Self::UNORM_A2BGR10 => "UNORM_A2BGR10",
            Self::UNORM_RGBA16 => "UNORM_RGBA16",
            Self::UNORM_BC1 => "UNORM_BC1",
            Self::UNORM_BC2 => "UNORM_BC2",
            Self::UNORM_BC3 => "UNORM_BC3",
            Self::UNORM_BC4 => "UNORM_BC4",
            Self::UNORM_BC5 => "UNORM_BC5",
            Self::UINT_R8 => "UINT_R8",
            Self::UINT_R16 => "UINT_R16",
            Self::UINT_RG8 => "UINT_RG8",
            Self::UINT_R32 => "UINT_R32",
            Self::UINT_RG16 => "UINT_RG16",
            Self::UINT_RGB10A2 => "UINT_RGB10A2",
            Self::UINT_RGBA8 => "UINT_RGBA8",
            Self::UINT_RG32 => "UINT_RG32",
            Self::UINT_RGBA16 => "UINT_RGBA16",
            Self::UINT_RGBA32 => "UINT_RGBA32",
            Self::SNORM_R8 => "SNORM_R8",
            Self::SNORM_R16 => "SNORM_R16",
            Self::SNORM_RG8 => "SNORM_RG8",
            Self::SNORM_RG16 => "SNORM_RG16",
            Self::SNORM_RGB10A2 => "SNORM_RGB10A2",
            Self::SNORM_RGBA8 => "SNORM_RGBA8",
            Self::SNORM_RGBA16 => "SNORM_RGBA16",
            Self::SNORM_BC4 => "SNORM_BC4",
            Self::SNORM_BC5 => "SNORM_BC5",
            Self::SINT_R8 => "SINT_R8",
            Self::SINT_R16 => "SINT_R16",
            Self::SINT_RG8 => "SINT_RG8",
            Self::SINT_R32 => "SINT_R32",
            Self::SINT_RG16 => "SINT_RG16",
            Self::SINT_RGB10A2 => "SINT_RGB10A2",
            Self::SINT_RGBA8 => "SINT_RGBA8",
            Self::SINT_RG32 => "SINT_RG32",
            Self::SINT_RGBA16 => "SINT_RGBA16",
            Self::SINT_RGBA32 => "SINT_RGBA32",
            Self::SRGB_RGBA8 => "SRGB_RGBA8",
            Self::SRGB_BC1 => "SRGB_BC1",
            Self::SRGB_BC2 => "SRGB_BC2",
            Self::SRGB_BC3 => "SRGB_BC3",
            Self::FLOAT_R16 => "FLOAT_R16",
            Self::FLOAT_R32 => "FLOAT_R32",
            Self::FLOAT_RG16 => "FLOAT_RG16",
            Self::FLOAT_D24_S8 => "FLOAT_D24_S8",
            Self::FLOAT_RG11B10 => "FLOAT_RG11B10",
            Self::FLOAT_D32_UINT_S8_X24 => "FLOAT_D32_UINT_S8_X24",
            Self::FLOAT_RG32 => "FLOAT_RG32",
            Self::FLOAT_RGBA16 => "FLOAT_RGBA16",
            Self::FLOAT_RGBA32 => "FLOAT_RGBA32",
            _ => return None,
        })
    }
}

impl fmt::Display for SurfaceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({:#05x})", self.0),
            None => write!(f, "{:#05x}", self.0),
        }
    }
}
