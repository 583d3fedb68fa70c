//! # Chunkvault
//!
//! A single-node content-addressed file store with chunk-level
//! deduplication that survives restarts without an external database.
//!
//! ## Overview
//!
//! - **Ingest**: Files are split into fixed-size chunks, each stored once
//!   under its Blake3 digest
//! - **Manifests**: Each filename maps to the ordered digests of its chunks,
//!   persisted as one JSON record per file
//! - **Bootstrap**: At startup the in-memory indexes are rebuilt from the
//!   manifest records
//! - **Reconstruct**: A file is rebuilt by concatenating its chunks in order
//!
//! ## Key Concepts
//!
//! - **Chunk**: Immutable. Written once, never rewritten or deleted.
//! - **Signature**: The digests of a chunk sequence joined with `-`. A known
//!   signature lets ingest skip chunk writes.
//! - **Manifest**: Last write wins per filename. No history.
//! - **Orphan chunk**: A blob no manifest references. Tolerated.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chunkvault::{Vault, VaultConfig};
//!
//! async fn example() {
//!     let config = VaultConfig::new("/var/lib/chunkvault").with_chunk_size(1024 * 1024);
//!     let (vault, report) = Vault::open(config).await.unwrap();
//!     println!("recovered {} files", report.files_recovered);
//!
//!     let ingest = vault.ingest("notes.txt", b"hello world".to_vec()).await.unwrap();
//!     assert_eq!(ingest.chunk_count, 1);
//!
//!     let bytes = vault.reconstruct("notes.txt").await.unwrap();
//!     assert_eq!(bytes.as_ref(), b"hello world");
//!
//!     for name in vault.list_filenames() {
//!         println!("{}", name);
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `chunkvault::core` - Core primitives (Chunker, ChunkDigest, FileManifest)
//! - `chunkvault::store` - Storage traits and backends

pub mod config;
pub mod error;
pub mod index;
pub mod vault;

// Re-export component crates
pub use chunkvault_core as core;
pub use chunkvault_store as store;

// Re-export main types for convenience
pub use config::{CorruptManifestPolicy, VaultConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_UPLOAD_SIZE};
pub use error::{Result, VaultError};
pub use index::{FileIndex, SignatureIndex};
pub use vault::{BootstrapReport, IngestReport, SkippedManifest, Vault};

// Re-export commonly used core types
pub use chunkvault_core::{Chunk, ChunkDigest, Chunker, FileManifest, Signature};
pub use chunkvault_store::{
    ChunkStore, FsChunkStore, FsManifestStore, ManifestEntry, ManifestStore, MemoryChunkStore,
    MemoryManifestStore, PutOutcome,
};
