//! Store traits: the abstract interface for chunk and manifest persistence.
//!
//! The vault is storage-agnostic. Implementations include the filesystem
//! (primary) and in-memory (for tests).

use async_trait::async_trait;
use bytes::Bytes;
use chunkvault_core::{ChunkDigest, FileManifest};

use crate::error::Result;

/// Result of writing a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// A new blob was written.
    Written,
    /// A blob for this digest already existed (idempotent, not an error).
    AlreadyPresent,
}

impl PutOutcome {
    /// Whether this call created the blob.
    pub fn is_written(self) -> bool {
        matches!(self, PutOutcome::Written)
    }
}

/// Write-once blob storage keyed by content digest.
///
/// # Design Notes
///
/// - **Idempotent puts**: Putting an existing digest returns `AlreadyPresent`
///   and leaves the stored blob untouched.
/// - **Atomic creation**: Concurrent puts of the same digest never expose a
///   partially written blob. Since a digest fixes its content, a lost race is
///   wasted work, not corruption.
/// - **No deletion**: Blobs are never removed. Unreferenced blobs are
///   tolerated orphans.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Store `data` under `digest` unless a blob already exists.
    ///
    /// The caller guarantees `digest == blake3(data)`.
    async fn put(&self, digest: ChunkDigest, data: Bytes) -> Result<PutOutcome>;

    /// Read the blob for `digest`.
    ///
    /// Fails with `ChunkMissing` if there is none, and with `ChunkCorrupt`
    /// if the backend verifies contents and they do not match.
    async fn get(&self, digest: &ChunkDigest) -> Result<Bytes>;

    /// Check whether a blob exists.
    async fn contains(&self, digest: &ChunkDigest) -> Result<bool>;

    /// All stored digests, in no particular order.
    async fn list(&self) -> Result<Vec<ChunkDigest>>;
}

/// One record returned by [`ManifestStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    /// A record that parsed and validated.
    Valid(FileManifest),
    /// A record that could not be read or validated.
    Corrupt {
        /// The record's storage name (e.g. `notes.txt.json`).
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Durable filename -> manifest records.
///
/// There is no multi-record transaction. `list` reports unreadable records
/// as [`ManifestEntry::Corrupt`] instead of failing, so a single damaged
/// record never hides the rest.
#[async_trait]
pub trait ManifestStore: Send + Sync {
    /// Persist `manifest`, replacing any record with the same filename.
    ///
    /// Returns only after the record is durable.
    async fn save(&self, manifest: &FileManifest) -> Result<()>;

    /// Load the record for one filename.
    async fn load(&self, filename: &str) -> Result<Option<FileManifest>>;

    /// Enumerate every record.
    async fn list(&self) -> Result<Vec<ManifestEntry>>;
}

// Shared handles: lets a caller keep an `Arc` to a store it hands the vault.

#[async_trait]
impl<S: ChunkStore + ?Sized> ChunkStore for std::sync::Arc<S> {
    async fn put(&self, digest: ChunkDigest, data: Bytes) -> Result<PutOutcome> {
        (**self).put(digest, data).await
    }

    async fn get(&self, digest: &ChunkDigest) -> Result<Bytes> {
        (**self).get(digest).await
    }

    async fn contains(&self, digest: &ChunkDigest) -> Result<bool> {
        (**self).contains(digest).await
    }

    async fn list(&self) -> Result<Vec<ChunkDigest>> {
        (**self).list().await
    }
}

#[async_trait]
impl<S: ManifestStore + ?Sized> ManifestStore for std::sync::Arc<S> {
    async fn save(&self, manifest: &FileManifest) -> Result<()> {
        (**self).save(manifest).await
    }

    async fn load(&self, filename: &str) -> Result<Option<FileManifest>> {
        (**self).load(filename).await
    }

    async fn list(&self) -> Result<Vec<ManifestEntry>> {
        (**self).list().await
    }
}
