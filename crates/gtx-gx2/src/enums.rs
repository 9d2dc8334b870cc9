//! GX2 enumerations.

use std::fmt;
use std::ops::BitOr;

use crate::{Error, Result};

macro_rules! u32_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $field:literal {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u32)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl TryFrom<u32> for $name {
            type Error = Error;

            fn try_from(value: u32) -> Result<Self> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(Error::InvalidEnum { field: $field, value }),
                }
            }
        }

        impl From<$name> for u32 {
            #[inline]
            fn from(value: $name) -> u32 {
                value as u32
            }
        }
    };
}

u32_enum! {
    /// Surface dimensionality.
    pub enum SurfaceDim: "surface dimension" {
        Tex1D = 0,
        Tex2D = 1,
        Tex3D = 2,
        Cube = 3,
        Tex1DArray = 4,
        Tex2DArray = 5,
        Tex2DMsaa = 6,
        Tex2DMsaaArray = 7,
    }
}

impl SurfaceDim {
    /// Check if the depth field counts array slices or volume layers.
    pub fn is_layered(self) -> bool {
        matches!(
            self,
            Self::Tex3D | Self::Tex1DArray | Self::Tex2DArray | Self::Tex2DMsaaArray
        )
    }

    /// Check if this is a multisampled kind.
    pub fn is_msaa(self) -> bool {
        matches!(self, Self::Tex2DMsaa | Self::Tex2DMsaaArray)
    }
}

u32_enum! {
    /// Antialiasing (multisample) mode.
    pub enum AaMode: "AA mode" {
        X1 = 0,
        X2 = 1,
        X4 = 2,
        X8 = 3,
    }
}

impl AaMode {
    /// Number of samples per pixel.
    pub fn samples(self) -> u32 {
        1 << self as u32
    }
}

u32_enum! {
    /// Logical tiling mode.
    ///
    /// `Default` asks the tiling engine to pick a mode; `LinearSpecial` is the
    /// untiled layout used for staging data on the host.
    pub enum TileMode: "tile mode" {
        Default = 0,
        LinearAligned = 1,
        Tiled1DThin1 = 2,
        Tiled1DThick = 3,
        Tiled2DThin1 = 4,
        Tiled2DThin2 = 5,
        Tiled2DThin4 = 6,
        Tiled2DThick = 7,
        Tiled2BThin1 = 8,
        Tiled2BThin2 = 9,
        Tiled2BThin4 = 10,
        Tiled2BThick = 11,
        Tiled3DThin1 = 12,
        Tiled3DThick = 13,
        Tiled3BThin1 = 14,
        Tiled3BThick = 15,
        LinearSpecial = 16,
    }
}

impl TileMode {
    /// The tile mode as encoded in hardware registers.
    ///
    /// `LinearSpecial` maps to the hardware's general linear mode (0); every
    /// other mode keeps its numeric value.
    pub fn hardware(self) -> u32 {
        match self {
            Self::LinearSpecial => 0,
            other => other as u32,
        }
    }
}

/// Surface usage flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct SurfaceUse(pub u32);

impl SurfaceUse {
    /// Sampled as a texture.
    pub const TEXTURE: Self = Self(0x1);
    /// Rendered to as a color buffer.
    pub const COLOR_BUFFER: Self = Self(0x2);
    /// Rendered to as a depth buffer.
    pub const DEPTH_BUFFER: Self = Self(0x4);
    /// Scanned out to a display.
    pub const SCAN_BUFFER: Self = Self(0x8);
    /// Final TV output.
    pub const FTV: Self = Self(0x8000_0000);

    /// Check if every flag in `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SurfaceUse {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Source channel for one output component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
    Alpha = 3,
    Zero = 4,
    One = 5,
}

impl Channel {
    /// Look up a channel by selector index.
    pub fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => Self::Red,
            1 => Self::Green,
            2 => Self::Blue,
            3 => Self::Alpha,
            4 => Self::Zero,
            5 => Self::One,
            _ => return None,
        })
    }

    /// Human-readable channel name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Alpha => "Alpha",
            Self::Zero => "Zero",
            Self::One => "One",
        }
    }
}

/// Packed component selector word.
///
/// One byte per output channel, red in the most significant byte. Each byte
/// holds a [`Channel`] index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct CompSel(pub u32);

impl CompSel {
    /// Identity mapping (R, G, B, A).
    pub const RGBA: Self = Self(0x0001_0203);

    /// Build a selector word from four channels (R, G, B, A order).
    pub fn from_channels(channels: [Channel; 4]) -> Self {
        Self(
            (channels[0] as u32) << 24
                | (channels[1] as u32) << 16
                | (channels[2] as u32) << 8
                | channels[3] as u32,
        )
    }

    /// Raw selector bytes in R, G, B, A order.
    pub fn indices(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Decoded channels, `None` for out-of-range bytes.
    pub fn channels(self) -> [Option<Channel>; 4] {
        self.indices().map(Channel::from_index)
    }
}

impl Default for CompSel {
    fn default() -> Self {
        Self::RGBA
    }
}

impl fmt::Display for CompSel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .channels()
            .map(|c| c.map_or("Invalid", Channel::name));
        write!(f, "{}, {}, {}, {}", names[0], names[1], names[2], names[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trip() {
        assert_eq!(SurfaceDim::try_from(3).unwrap(), SurfaceDim::Cube);
        assert_eq!(u32::from(TileMode::LinearSpecial), 16);
        assert!(matches!(
            AaMode::try_from(4),
            Err(Error::InvalidEnum { value: 4, .. })
        ));
    }

    #[test]
    fn test_hardware_tile_mode() {
        assert_eq!(TileMode::LinearSpecial.hardware(), 0);
        assert_eq!(TileMode::Tiled2DThin1.hardware(), 4);
    }

    #[test]
    fn test_comp_sel_channels() {
        let sel = CompSel::from_channels([Channel::Red, Channel::Red, Channel::Red, Channel::One]);
        assert_eq!(sel.0, 0x0000_0005);
        assert_eq!(sel.to_string(), "Red, Red, Red, One");
        assert_eq!(CompSel(0x0001_0209).channels()[3], None);
    }

    #[test]
    fn test_surface_use_flags() {
        let usage = SurfaceUse::TEXTURE | SurfaceUse::DEPTH_BUFFER;
        assert!(usage.contains(SurfaceUse::TEXTURE));
        assert!(usage.contains(SurfaceUse::DEPTH_BUFFER));
        assert!(!usage.contains(SurfaceUse::COLOR_BUFFER));
    }

    #[test]
    fn test_aa_samples() {
        assert_eq!(AaMode::X1.samples(), 1);
        assert_eq!(AaMode::X8.samples(), 8);
    }
}
