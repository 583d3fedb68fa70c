//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tempfile::TempDir;

use chunkvault::{BootstrapReport, Vault, VaultConfig};
use chunkvault_core::ChunkDigest;
use chunkvault_store::{
    ChunkStore, FsChunkStore, FsManifestStore, MemoryChunkStore, MemoryManifestStore, PutOutcome,
    Result as StoreResult, StoreError,
};

/// A filesystem-backed vault rooted in a temporary directory.
///
/// The directory lives as long as the fixture, so a test can drop a vault
/// and [`open`](Self::open) it again to simulate a restart.
pub struct TestVault {
    dir: TempDir,
    config: VaultConfig,
}

impl TestVault {
    /// Create a fresh fixture with the given chunk size.
    pub fn new(chunk_size: usize) -> Self {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("cannot create temp dir: {}", e));
        let config = VaultConfig::new(dir.path()).with_chunk_size(chunk_size);
        Self { dir, config }
    }

    /// Replace the configuration. Storage directories should stay inside
    /// [`root`](Self::root).
    pub fn with_config(mut self, f: impl FnOnce(VaultConfig) -> VaultConfig) -> Self {
        self.config = f(self.config);
        self
    }

    /// The fixture's configuration.
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Open (or reopen) the vault, bootstrapping from whatever is on disk.
    pub async fn open(
        &self,
    ) -> chunkvault::Result<(Vault<FsChunkStore, FsManifestStore>, BootstrapReport)> {
        Vault::open(self.config.clone()).await
    }

    /// Path of the blob for `digest`.
    pub fn chunk_path(&self, digest: &ChunkDigest) -> PathBuf {
        self.config.chunk_dir.join(digest.to_hex())
    }

    /// Path of the manifest record for `filename`.
    pub fn manifest_path(&self, filename: &str) -> PathBuf {
        self.config.manifest_dir.join(format!("{}.json", filename))
    }

    /// Number of entries in the chunk directory.
    pub fn chunk_file_count(&self) -> usize {
        count_entries(&self.config.chunk_dir)
    }

    /// Number of entries in the manifest directory.
    pub fn manifest_file_count(&self) -> usize {
        count_entries(&self.config.manifest_dir)
    }
}

fn count_entries(dir: &std::path::Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

/// A vault over shared in-memory stores.
///
/// The stores are returned alongside so tests can inspect or damage them.
pub async fn memory_vault(
    chunk_size: usize,
) -> (
    Vault<Arc<MemoryChunkStore>, Arc<MemoryManifestStore>>,
    Arc<MemoryChunkStore>,
    Arc<MemoryManifestStore>,
) {
    let chunks = Arc::new(MemoryChunkStore::new());
    let manifests = Arc::new(MemoryManifestStore::new());
    let config = VaultConfig::default().with_chunk_size(chunk_size);
    let (vault, _) = Vault::bootstrap(chunks.clone(), manifests.clone(), config)
        .await
        .unwrap_or_else(|e| panic!("cannot bootstrap memory vault: {}", e));
    (vault, chunks, manifests)
}

/// A chunk store that fails every `put` after a fixed number of successes.
///
/// Used to check that a failed ingest commits nothing.
pub struct FaultyChunkStore<S> {
    inner: S,
    remaining: AtomicUsize,
}

impl<S: ChunkStore> FaultyChunkStore<S> {
    /// Allow `successes` puts through, then fail.
    pub fn fail_after(inner: S, successes: usize) -> Self {
        Self {
            inner,
            remaining: AtomicUsize::new(successes),
        }
    }

    /// Allow `successes` more puts through.
    pub fn reset(&self, successes: usize) {
        self.remaining.store(successes, Ordering::SeqCst);
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ChunkStore> ChunkStore for FaultyChunkStore<S> {
    async fn put(&self, digest: ChunkDigest, data: Bytes) -> StoreResult<PutOutcome> {
        let allowed = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !allowed {
            return Err(StoreError::Io(std::io::Error::other("injected put failure")));
        }
        self.inner.put(digest, data).await
    }

    async fn get(&self, digest: &ChunkDigest) -> StoreResult<Bytes> {
        self.inner.get(digest).await
    }

    async fn contains(&self, digest: &ChunkDigest) -> StoreResult<bool> {
        self.inner.contains(digest).await
    }

    async fn list(&self) -> StoreResult<Vec<ChunkDigest>> {
        self.inner.list().await
    }
}

/// Deterministic pseudo-random content.
pub fn random_content(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut buf = vec![0u8; len];
    rng.fill_bytes(&mut buf);
    buf
}

/// Install a test-writer tracing subscriber. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}
