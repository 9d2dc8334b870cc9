//! Error types for DDS import.

use thiserror::Error;

/// Errors that can occur when importing a DDS file.
#[derive(Debug, Error)]
pub enum Error {
    /// Low-level read failure.
    #[error("{0}")]
    Common(#[from] gtx_common::Error),

    /// GX2 descriptor or tiling error.
    #[error("{0}")]
    Gx2(#[from] gtx_gx2::Error),

    /// The file does not start with "DDS ".
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// The header is malformed.
    #[error("invalid DDS header: {0}")]
    InvalidHeader(String),

    /// The file uses a feature the importer does not handle.
    #[error("unsupported DDS feature: {0}")]
    UnsupportedFeature(&'static str),

    /// No native format matches the file's pixel format.
    #[error("unrecognized DDS pixel format: {0}")]
    UnrecognizedFormat(String),

    /// A selector template byte does not name a channel.
    #[error("invalid component selector template: {0:#010x}")]
    InvalidSelector(u32),

    /// The file ends before the first level is complete.
    #[error("DDS data truncated: needed {needed} bytes but only {available} available")]
    Truncated { needed: usize, available: usize },
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
