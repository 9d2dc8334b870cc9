//! Error types for GX2 descriptors.

use thiserror::Error;

/// Errors that can occur when validating, serializing or building GX2 resources.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] gtx_common::Error),

    /// A serialized enumeration field holds an unknown value.
    #[error("invalid {field} value: {value:#x}")]
    InvalidEnum { field: &'static str, value: u32 },

    /// A descriptor failed structural verification.
    #[error("verification failed: {0}")]
    Verification(&'static str),

    /// A view range lies outside its parent extent.
    #[error("{what} view range out of bounds: first {first} + count {count} exceeds {limit}")]
    Range {
        what: &'static str,
        first: u32,
        count: u32,
        limit: u32,
    },

    /// Register synthesis preconditions are not met.
    #[error("cannot compose texture registers: {0}")]
    Precomposition(&'static str),

    /// Input data is shorter than the surface requires.
    #[error("{what} data truncated: needed {needed} bytes but only {available} available")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    /// A surface buffer required by the operation is absent.
    #[error("surface has no {0} data")]
    MissingData(&'static str),

    /// The tiling engine rejected an operation.
    #[error("tiling engine error: {0}")]
    Tiling(String),
}

/// Result type for GX2 operations.
pub type Result<T> = std::result::Result<T, Error>;
