//! Common utilities for GTX.
//!
//! This crate provides foundational types used across all GTX crates:
//!
//! - [`BinaryReader`] - Endian-aware zero-copy reading from byte slices
//! - [`BinaryWriter`] - Endian-aware writing into a growable buffer
//! - [`Endian`] - Byte order selection for on-disk records
//! - [`ByteSwap`] - Field-by-field byte order conversion for fixed-layout records

mod endian;
mod error;
mod reader;
mod writer;

pub use endian::{swap_words, ByteSwap, Endian};
pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
