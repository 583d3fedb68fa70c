//! Error types for the Chunkvault core.

use thiserror::Error;

/// Errors raised by the pure chunking and manifest primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("invalid chunk digest {0:?}: expected 64 lowercase hex characters")]
    InvalidDigest(String),

    #[error("filename {0:?} cannot be reduced to a safe basename")]
    InvalidFilename(String),

    #[error("malformed manifest: {0}")]
    MalformedManifest(String),

    #[error("signature mismatch: recorded {recorded}, computed {computed}")]
    SignatureMismatch { recorded: String, computed: String },

    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
