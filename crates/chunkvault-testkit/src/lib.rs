//! # Chunkvault Testkit
//!
//! Testing utilities for Chunkvault.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known chunk digests and signatures that any
//!   compatible implementation must reproduce
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Temporary vaults, fault-injecting stores, and tracing setup
//!
//! ## Golden Vectors
//!
//! ```rust
//! use chunkvault_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     let manifest = vector.manifest("vector.bin");
//!     assert_eq!(manifest.signature().as_str(), vector.expected_signature());
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use chunkvault_testkit::generators::IngestCase;
//!
//! proptest! {
//!     #[test]
//!     fn chunks_cover_content(case: IngestCase) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,ignore
//! use chunkvault_testkit::fixtures::TestVault;
//!
//! let fixture = TestVault::new(1024);
//! let (vault, _) = fixture.open().await?;
//! vault.ingest("a.txt", b"hello".to_vec()).await?;
//! drop(vault);
//! let (vault, report) = fixture.open().await?;
//! assert_eq!(report.files_recovered, 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{init_tracing, memory_vault, random_content, FaultyChunkStore, TestVault};
pub use generators::IngestCase;
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
