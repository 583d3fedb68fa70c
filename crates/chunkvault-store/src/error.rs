//! Error types for the store module.

use chunkvault_core::{ChunkDigest, CoreError};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No blob exists for a digest.
    #[error("chunk not found: {0}")]
    ChunkMissing(ChunkDigest),

    /// A blob exists but its bytes do not hash to its name.
    #[error("chunk {expected} is corrupt: contents hash to {actual}")]
    ChunkCorrupt {
        expected: ChunkDigest,
        actual: ChunkDigest,
    },

    /// A manifest record could not be read or validated.
    #[error("manifest {name} is corrupt: {reason}")]
    ManifestCorrupt { name: String, reason: String },

    /// Invalid data passed to or found in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking storage task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(String),

    /// Error from the core primitives.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
