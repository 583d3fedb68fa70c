//! In-memory implementation of the store traits.
//!
//! This is primarily for testing. It has the same semantics as the
//! filesystem backend but keeps everything in memory with no persistence.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use bytes::Bytes;

use chunkvault_core::{ChunkDigest, FileManifest};

use crate::error::{Result, StoreError};
use crate::record::{decode_record, record_name};
use crate::traits::{ChunkStore, ManifestEntry, ManifestStore, PutOutcome};

/// In-memory chunk store.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryChunkStore {
    chunks: RwLock<HashMap<ChunkDigest, Bytes>>,
}

impl MemoryChunkStore {
    /// Create a new empty chunk store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.chunks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop a blob, simulating on-disk loss.
    pub fn remove(&self, digest: &ChunkDigest) -> Option<Bytes> {
        self.chunks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(digest)
    }
}

#[async_trait]
impl ChunkStore for MemoryChunkStore {
    async fn put(&self, digest: ChunkDigest, data: Bytes) -> Result<PutOutcome> {
        let mut chunks = self.chunks.write().unwrap_or_else(PoisonError::into_inner);
        if chunks.contains_key(&digest) {
            return Ok(PutOutcome::AlreadyPresent);
        }
        chunks.insert(digest, data);
        Ok(PutOutcome::Written)
    }

    async fn get(&self, digest: &ChunkDigest) -> Result<Bytes> {
        let chunks = self.chunks.read().unwrap_or_else(PoisonError::into_inner);
        chunks
            .get(digest)
            .cloned()
            .ok_or(StoreError::ChunkMissing(*digest))
    }

    async fn contains(&self, digest: &ChunkDigest) -> Result<bool> {
        let chunks = self.chunks.read().unwrap_or_else(PoisonError::into_inner);
        Ok(chunks.contains_key(digest))
    }

    async fn list(&self) -> Result<Vec<ChunkDigest>> {
        let chunks = self.chunks.read().unwrap_or_else(PoisonError::into_inner);
        Ok(chunks.keys().copied().collect())
    }
}

/// In-memory manifest store.
///
/// Records are kept in their encoded JSON form, keyed by record name, so
/// that damaged records can be planted with [`MemoryManifestStore::insert_raw`].
#[derive(Default)]
pub struct MemoryManifestStore {
    records: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryManifestStore {
    /// Create a new empty manifest store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw record bytes under `filename`, bypassing encoding.
    pub fn insert_raw(&self, filename: &str, bytes: impl Into<Vec<u8>>) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record_name(filename), bytes.into());
    }
}

#[async_trait]
impl ManifestStore for MemoryManifestStore {
    async fn save(&self, manifest: &FileManifest) -> Result<()> {
        let json = manifest.to_json()?;
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record_name(manifest.filename()), json);
        Ok(())
    }

    async fn load(&self, filename: &str) -> Result<Option<FileManifest>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let name = record_name(filename);
        records.get(&name).map(|bytes| decode_record(&name, bytes)).transpose()
    }

    async fn list(&self) -> Result<Vec<ManifestEntry>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records
            .iter()
            .map(|(name, bytes)| match decode_record(name, bytes) {
                Ok(manifest) => ManifestEntry::Valid(manifest),
                Err(e) => ManifestEntry::Corrupt {
                    name: name.clone(),
                    reason: e.to_string(),
                },
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_chunk_store_idempotent() {
        let store = MemoryChunkStore::new();
        let data = Bytes::from_static(b"hello");
        let digest = ChunkDigest::of(&data);

        assert_eq!(store.put(digest, data.clone()).await.unwrap(), PutOutcome::Written);
        assert_eq!(
            store.put(digest, data.clone()).await.unwrap(),
            PutOutcome::AlreadyPresent
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&digest).await.unwrap(), data);
    }

    #[tokio::test]
    async fn test_memory_chunk_store_remove() {
        let store = MemoryChunkStore::new();
        let digest = ChunkDigest::of(b"gone");
        store.put(digest, Bytes::from_static(b"gone")).await.unwrap();

        assert!(store.remove(&digest).is_some());
        assert!(matches!(
            store.get(&digest).await,
            Err(StoreError::ChunkMissing(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_manifest_store() {
        let store = MemoryManifestStore::new();
        let m = FileManifest::new("a.txt", vec![ChunkDigest::of(b"a")]);
        store.save(&m).await.unwrap();
        store.insert_raw("broken", b"not json".to_vec());

        assert_eq!(store.load("a.txt").await.unwrap(), Some(m.clone()));
        assert!(store.load("broken").await.is_err());

        let entries = store.list().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&ManifestEntry::Valid(m)));
        assert!(entries
            .iter()
            .any(|e| matches!(e, ManifestEntry::Corrupt { name, .. } if name == "broken.json")));
    }
}
