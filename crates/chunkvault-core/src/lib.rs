//! # Chunkvault Core
//!
//! Pure primitives for Chunkvault: fixed-size chunking, content digests, and
//! file manifests.
//!
//! This crate contains no I/O. It is pure computation over byte buffers and
//! the manifest record format.
//!
//! ## Key Types
//!
//! - [`Chunker`] - Splits a buffer into fixed-size [`Chunk`]s
//! - [`ChunkDigest`] - Content address of a chunk (Blake3)
//! - [`Signature`] - Identifier of an ordered chunk-digest sequence
//! - [`FileManifest`] - Filename -> signature + ordered digests
//!
//! ## Usage
//!
//! ```rust
//! use chunkvault_core::{Chunker, FileManifest};
//!
//! let chunker = Chunker::new(10).unwrap();
//! let chunks = chunker.chunk(vec![7u8; 25]);
//! assert_eq!(chunks.len(), 3);
//!
//! let manifest = FileManifest::new("data.bin", chunks.iter().map(|c| c.digest).collect());
//! assert_eq!(manifest.chunk_count(), 3);
//! ```

pub mod chunker;
pub mod digest;
pub mod error;
pub mod filename;
pub mod manifest;

pub use chunker::{Chunk, Chunker};
pub use digest::{ChunkDigest, DIGEST_HEX_LEN, DIGEST_LEN};
pub use error::{CoreError, Result};
pub use filename::{sanitize_filename, MANIFEST_SUFFIX, MAX_FILENAME_LEN};
pub use manifest::{FileManifest, Signature, SIGNATURE_SEPARATOR};
