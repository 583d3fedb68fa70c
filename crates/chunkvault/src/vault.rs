//! The Vault: ingest, reconstruct, and list stored files.
//!
//! The Vault brings together the chunker, the chunk and manifest stores,
//! and the in-memory indexes. A Vault only comes into existence through
//! [`Vault::bootstrap`] (or [`Vault::open`]), so the indexes are always
//! rebuilt from durable manifests before the first request is served.

use std::collections::{BTreeSet, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::{Bytes, BytesMut};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use chunkvault_core::{sanitize_filename, Chunker, FileManifest, Signature};
use chunkvault_store::{
    ChunkStore, FsChunkStore, FsManifestStore, ManifestEntry, ManifestStore, StoreError,
};

use crate::config::{CorruptManifestPolicy, VaultConfig};
use crate::error::{Result, VaultError};
use crate::index::VaultState;

/// Outcome of a successful ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// The sanitized filename the content is stored under.
    pub filename: String,
    /// Signature of the content's chunk sequence.
    pub signature: Signature,
    /// Whether any chunk blob was created by this call.
    pub new_chunks_written: bool,
    /// Number of chunks the content split into.
    pub chunk_count: usize,
    /// Number of chunk blobs this call created.
    pub chunks_written: usize,
    /// Content size in bytes.
    pub size: u64,
    /// Whether the signature was already known, so no chunk was touched.
    pub deduplicated: bool,
    /// Whether an earlier manifest for the same filename was replaced.
    pub replaced: bool,
}

/// A manifest record skipped during bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedManifest {
    /// Storage name of the record.
    pub name: String,
    /// Why it could not be used.
    pub reason: String,
}

/// Summary of index recovery at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Filenames recovered into the file index.
    pub files_recovered: usize,
    /// Distinct signatures recovered into the signature index.
    pub signatures_recovered: usize,
    /// Records that were skipped as corrupt.
    pub skipped: Vec<SkippedManifest>,
}

/// The main Vault struct.
///
/// Provides:
/// - Chunk-level deduplicated ingest
/// - Byte-exact reconstruction
/// - Filename listing
///
/// Share it between tasks behind an `Arc`.
pub struct Vault<C: ChunkStore, M: ManifestStore> {
    /// Chunk blob storage.
    chunks: C,
    /// Manifest storage.
    manifests: M,
    /// Configured chunker.
    chunker: Chunker,
    /// Configuration.
    config: VaultConfig,
    /// File and signature indexes.
    state: RwLock<VaultState>,
    /// Serializes manifest persistence with the file index update, so the
    /// index always agrees with the last record written for a filename.
    commit: Mutex<()>,
}

impl Vault<FsChunkStore, FsManifestStore> {
    /// Open the filesystem-backed vault described by `config`.
    ///
    /// Creates the storage directories if needed, then bootstraps.
    pub async fn open(config: VaultConfig) -> Result<(Self, BootstrapReport)> {
        config.validate()?;
        let chunks = FsChunkStore::open(&config.chunk_dir)?
            .with_verify_on_read(config.verify_chunks_on_read);
        let manifests = FsManifestStore::open(&config.manifest_dir)?;
        Self::bootstrap(chunks, manifests, config).await
    }
}

impl<C: ChunkStore, M: ManifestStore> Vault<C, M> {
    // ─────────────────────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a vault over existing stores, rebuilding the indexes from every
    /// durable manifest.
    ///
    /// Corrupt records are skipped with a warning under
    /// [`CorruptManifestPolicy::Skip`], and abort startup with
    /// [`VaultError::ManifestCorrupt`] under [`CorruptManifestPolicy::Fail`].
    pub async fn bootstrap(
        chunks: C,
        manifests: M,
        config: VaultConfig,
    ) -> Result<(Self, BootstrapReport)> {
        config.validate()?;
        let chunker = Chunker::new(config.chunk_size)?;

        let mut state = VaultState::default();
        let mut skipped = Vec::new();

        for entry in manifests.list().await? {
            match entry {
                ManifestEntry::Valid(manifest) => {
                    state.signatures.add(manifest.signature().clone());
                    state.files.insert(manifest);
                }
                ManifestEntry::Corrupt { name, reason } => match config.corrupt_manifests {
                    CorruptManifestPolicy::Skip => {
                        warn!(record = %name, %reason, "skipping corrupt manifest");
                        skipped.push(SkippedManifest { name, reason });
                    }
                    CorruptManifestPolicy::Fail => {
                        return Err(VaultError::ManifestCorrupt { name, reason });
                    }
                },
            }
        }

        let report = BootstrapReport {
            files_recovered: state.files.len(),
            signatures_recovered: state.signatures.len(),
            skipped,
        };
        info!(
            files = report.files_recovered,
            signatures = report.signatures_recovered,
            skipped = report.skipped.len(),
            "bootstrap complete"
        );

        let vault = Self {
            chunks,
            manifests,
            chunker,
            config,
            state: RwLock::new(state),
            commit: Mutex::new(()),
        };
        Ok((vault, report))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ingest
    // ─────────────────────────────────────────────────────────────────────────

    /// Store `content` under `filename`.
    ///
    /// The filename is reduced to its basename. Empty content and content
    /// over the upload limit are rejected with [`VaultError::InvalidInput`].
    ///
    /// If the content's signature is new, every chunk is written first; a
    /// failed write aborts the call with nothing committed (blobs already
    /// written remain as orphans). Only then is the signature recorded and
    /// the manifest persisted, replacing any earlier one for the filename.
    pub async fn ingest(&self, filename: &str, content: impl Into<Bytes>) -> Result<IngestReport> {
        let filename = sanitize_filename(filename)?;
        let content: Bytes = content.into();

        if content.is_empty() {
            return Err(VaultError::InvalidInput(format!(
                "empty content for {}",
                filename
            )));
        }
        if let Some(limit) = self.config.max_upload_size {
            if content.len() > limit {
                return Err(VaultError::InvalidInput(format!(
                    "{} is {} bytes, over the {} byte limit",
                    filename,
                    content.len(),
                    limit
                )));
            }
        }

        let size = content.len() as u64;
        let chunks = self.chunker.chunk(content);
        let manifest = FileManifest::new(filename, chunks.iter().map(|c| c.digest).collect());
        let signature = manifest.signature().clone();

        let deduplicated = self.read_state().signatures.contains(&signature);
        let mut chunks_written = 0;

        if !deduplicated {
            let mut seen = HashSet::with_capacity(chunks.len());
            for chunk in &chunks {
                if !seen.insert(chunk.digest) {
                    continue;
                }
                if self.chunks.put(chunk.digest, chunk.data.clone()).await?.is_written() {
                    chunks_written += 1;
                }
            }
            self.write_state().signatures.add(signature.clone());
        }

        let replaced = {
            let _commit = self.commit.lock().await;
            self.manifests.save(&manifest).await?;
            self.write_state().files.insert(manifest.clone()).is_some()
        };

        info!(
            filename = manifest.filename(),
            chunks = manifest.chunk_count(),
            written = chunks_written,
            deduplicated,
            "ingested file"
        );

        Ok(IngestReport {
            filename: manifest.filename().to_string(),
            signature,
            new_chunks_written: chunks_written > 0,
            chunk_count: manifest.chunk_count(),
            chunks_written,
            size,
            deduplicated,
            replaced,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reconstruct
    // ─────────────────────────────────────────────────────────────────────────

    /// Rebuild the current content of `filename`.
    ///
    /// Chunks are read in manifest order. If any is missing or damaged the
    /// whole call fails with [`VaultError::CorruptStore`]; partial content
    /// is never returned.
    pub async fn reconstruct(&self, filename: &str) -> Result<Bytes> {
        let manifest = self
            .manifest(filename)
            .ok_or_else(|| VaultError::NotFound(filename.to_string()))?;

        let mut parts = Vec::with_capacity(manifest.chunk_count());
        for digest in manifest.chunk_digests() {
            match self.chunks.get(digest).await {
                Ok(data) => parts.push(data),
                Err(e @ (StoreError::ChunkMissing(_) | StoreError::ChunkCorrupt { .. })) => {
                    warn!(
                        filename = manifest.filename(),
                        %digest,
                        error = %e,
                        "cannot reconstruct file"
                    );
                    return Err(VaultError::CorruptStore {
                        filename: manifest.filename().to_string(),
                        digest: *digest,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }

        if parts.len() == 1 {
            return Ok(parts.swap_remove(0));
        }

        let total = parts.iter().map(Bytes::len).sum();
        let mut out = BytesMut::with_capacity(total);
        for part in &parts {
            out.extend_from_slice(part);
        }
        debug!(filename = manifest.filename(), size = total, "reconstructed file");
        Ok(out.freeze())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// All stored filenames.
    pub fn list_filenames(&self) -> BTreeSet<String> {
        self.read_state().files.filenames()
    }

    /// Current manifest for `filename`, if any.
    ///
    /// The name is sanitized the same way ingest sanitizes it.
    pub fn manifest(&self, filename: &str) -> Option<FileManifest> {
        let filename = sanitize_filename(filename).ok()?;
        self.read_state().files.get(&filename).cloned()
    }

    /// Whether `filename` is stored.
    pub fn contains(&self, filename: &str) -> bool {
        self.manifest(filename).is_some()
    }

    /// Number of distinct chunk sequences ever ingested.
    pub fn signature_count(&self) -> usize {
        self.read_state().signatures.len()
    }

    /// The configuration.
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// The chunk store.
    pub fn chunk_store(&self) -> &C {
        &self.chunks
    }

    /// The manifest store.
    pub fn manifest_store(&self) -> &M {
        &self.manifests
    }

    fn read_state(&self) -> RwLockReadGuard<'_, VaultState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, VaultState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
