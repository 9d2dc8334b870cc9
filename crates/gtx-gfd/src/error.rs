//! Error types for GFD archive parsing and writing.

use thiserror::Error;

/// Errors that can occur when loading or saving a GFD archive.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] gtx_common::Error),

    /// GX2 descriptor error.
    #[error("{0}")]
    Gx2(#[from] gtx_gx2::Error),

    /// A record does not start with its magic value.
    #[error("invalid {what} magic: expected {expected:#010x}, got {actual:#010x}")]
    MagicMismatch {
        what: &'static str,
        expected: u32,
        actual: u32,
    },

    /// A declared size does not match the size required by context.
    #[error("{what} size mismatch: expected {expected:#x}, got {actual:#x}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A version number is outside the supported set.
    #[error("unsupported {what} version {major}.{minor}")]
    VersionUnsupported {
        what: &'static str,
        major: u32,
        minor: u32,
    },

    /// The archive targets a GPU other than GPU7.
    #[error("unsupported GPU version: {0}")]
    GpuVersion(u32),

    /// A block header carries the invalid type code.
    #[error("invalid block type: {0}")]
    InvalidBlockType(u32),

    /// A block arrived in a position its context does not allow.
    #[error("block out of sequence: {0}")]
    Sequence(&'static str),

    /// The archive is not configured for the requested operation.
    #[error("configuration error: {0}")]
    Configuration(&'static str),

    /// A relocated pointer inside a shader header block is out of range.
    #[error("{what} pointer {pointer:#010x} is outside its block")]
    InvalidPointer { what: &'static str, pointer: u32 },

    /// An error raised while decoding the archive at a byte offset.
    #[error("at offset {offset:#x}: {source}")]
    AtOffset {
        offset: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach a byte offset, unless one is already present.
    pub fn at(self, offset: usize) -> Self {
        match self {
            Self::AtOffset { .. } => self,
            other => Self::AtOffset {
                offset,
                source: Box::new(other),
            },
        }
    }

    /// Byte offset at which the error occurred, if known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::AtOffset { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// The underlying error without offset context.
    pub fn root(&self) -> &Error {
        match self {
            Self::AtOffset { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type for GFD operations.
pub type Result<T> = std::result::Result<T, Error>;
