//! Error types for KTX import and export.

use thiserror::Error;

/// Errors that can occur when reading or writing KTX files.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] gtx_common::Error),

    /// GX2 descriptor or tiling error.
    #[error("{0}")]
    Gx2(#[from] gtx_gx2::Error),

    /// The file does not start with the KTX 1.1 identifier.
    #[error("not a KTX 1.1 file")]
    InvalidIdentifier,

    /// Invalid KTX header.
    #[error("invalid KTX header: {0}")]
    InvalidHeader(String),

    /// The file or texture uses a feature that is not handled.
    #[error("unsupported KTX feature: {0}")]
    UnsupportedFeature(&'static str),

    /// No native format matches the GL format pair.
    #[error("unrecognized GL format: internal {internal:#06x}, base {base:#06x}")]
    UnrecognizedFormat { internal: u32, base: u32 },

    /// The surface format has no GL equivalent.
    #[error("surface format {0} has no KTX equivalent")]
    UnsupportedFormat(gtx_gx2::SurfaceFormat),

    /// A selector template byte does not name a channel.
    #[error("invalid component selector template: {0:#010x}")]
    InvalidSelector(u32),

    /// The file ends inside a header field or level.
    #[error("KTX {what} truncated: needed {needed} bytes but only {available} available")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },
}

/// Result type for KTX operations.
pub type Result<T> = std::result::Result<T, Error>;
