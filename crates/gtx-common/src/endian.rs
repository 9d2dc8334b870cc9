//! Byte order handling for fixed-layout records.
//!
//! GFD records are stored as sequences of 32-bit words in either byte order.
//! A record type implements [`ByteSwap`] by swapping each of its fields, which
//! gives two explicit modes of operation:
//!
//! - decode into a fresh value ([`BinaryReader::read_record`](crate::BinaryReader::read_record))
//! - normalize an existing value in place ([`ByteSwap::normalize`])
//!
//! When the requested order matches the host, both modes are plain copies.

use zerocopy::{FromBytes, IntoBytes};

/// Byte order of serialized data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    /// Most significant byte first. GFD files use this order.
    #[default]
    Big,
    /// Least significant byte first.
    Little,
}

impl Endian {
    /// The byte order of the host.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Self = Self::Big;
    /// The byte order of the host.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Self = Self::Little;

    /// Check if this order matches the host's.
    #[inline]
    pub const fn is_native(self) -> bool {
        matches!(
            (self, Self::NATIVE),
            (Self::Big, Self::Big) | (Self::Little, Self::Little)
        )
    }
}

/// Field-by-field byte order conversion.
pub trait ByteSwap {
    /// Reverse the byte order of every multi-byte field.
    fn byte_swap(&mut self);

    /// Convert between `endian` and host order in place.
    ///
    /// Swapping is its own inverse, so the same call converts to and from
    /// the serialized order.
    #[inline]
    fn normalize(&mut self, endian: Endian) {
        if !endian.is_native() {
            self.byte_swap();
        }
    }
}

impl ByteSwap for u16 {
    #[inline]
    fn byte_swap(&mut self) {
        *self = self.swap_bytes();
    }
}

impl ByteSwap for u32 {
    #[inline]
    fn byte_swap(&mut self) {
        *self = self.swap_bytes();
    }
}

impl ByteSwap for u64 {
    #[inline]
    fn byte_swap(&mut self) {
        *self = self.swap_bytes();
    }
}

/// Reverse every 32-bit word of a record made only of `u32` fields.
///
/// Trailing bytes that do not form a whole word are left as they are.
#[inline]
pub fn swap_words<T: FromBytes + IntoBytes>(record: &mut T) {
    for word in record.as_mut_bytes().chunks_exact_mut(4) {
        word.reverse();
    }
}

impl<T: ByteSwap, const N: usize> ByteSwap for [T; N] {
    #[inline]
    fn byte_swap(&mut self) {
        for value in self.iter_mut() {
            value.byte_swap();
        }
    }
}
