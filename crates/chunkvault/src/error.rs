//! Error types for the Vault.

use chunkvault_core::{ChunkDigest, CoreError};
use chunkvault_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Missing or empty payload, oversized payload, or unusable filename.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No manifest for the requested filename.
    #[error("file not found: {0}")]
    NotFound(String),

    /// A manifest references a chunk that is missing or damaged.
    #[error("store is corrupt: {filename} references chunk {digest}: {reason}")]
    CorruptStore {
        filename: String,
        digest: ChunkDigest,
        reason: String,
    },

    /// A durable manifest could not be parsed. Only surfaced during
    /// bootstrap, and only under the strict policy.
    #[error("manifest {name} is corrupt: {reason}")]
    ManifestCorrupt { name: String, reason: String },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<CoreError> for VaultError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidChunkSize => VaultError::Config(e.to_string()),
            other => VaultError::InvalidInput(other.to_string()),
        }
    }
}

/// Result type for Vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
