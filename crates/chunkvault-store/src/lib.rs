//! # Chunkvault Store
//!
//! Storage abstraction for Chunkvault. Provides trait-based interfaces for
//! chunk blob and manifest persistence, with filesystem and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The vault is storage-agnostic: it talks to a [`ChunkStore`] and a
//! [`ManifestStore`]. The primary implementations are [`FsChunkStore`] and
//! [`FsManifestStore`], with [`MemoryChunkStore`] and [`MemoryManifestStore`]
//! for testing.
//!
//! ## Key Types
//!
//! - [`ChunkStore`] - Write-once blob storage keyed by digest
//! - [`ManifestStore`] - One durable record per filename
//! - [`PutOutcome`] - Result of writing a chunk
//! - [`ManifestEntry`] - A listed record, valid or corrupt
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use chunkvault_core::ChunkDigest;
//! use chunkvault_store::{ChunkStore, FsChunkStore, PutOutcome};
//!
//! async fn example() {
//!     let store = FsChunkStore::open("data/chunks").unwrap();
//!     let data = Bytes::from_static(b"hello");
//!     let outcome = store.put(ChunkDigest::of(&data), data).await.unwrap();
//!     assert_eq!(outcome, PutOutcome::Written);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Idempotent puts**: Putting the same chunk twice returns `AlreadyPresent`
//! - **Atomic writes**: Blobs and records are written to temp files and renamed
//! - **Lenient listing**: Damaged manifest records are reported, not fatal

pub mod error;
pub mod fs;
pub mod memory;
mod record;
pub mod traits;

pub use error::{Result, StoreError};
pub use fs::{FsChunkStore, FsManifestStore};
pub use memory::{MemoryChunkStore, MemoryManifestStore};
pub use traits::{ChunkStore, ManifestEntry, ManifestStore, PutOutcome};
