//! Errors raised while reading or writing raw bytes.

use thiserror::Error;

/// Low-level read/write failure shared by every GTX crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The input ends before the value being read.
    #[error("unexpected end of data: needed {needed} bytes, {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Writing to the output buffer failed.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    /// A string in a name table is not valid UTF-8.
    #[error("invalid UTF-8 in string: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// A string runs to the end of its table without a terminator.
    #[error("string missing NUL terminator")]
    MissingNullTerminator,
}

/// Result alias using the shared [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
