//! In-memory indexes rebuilt from durable manifests at startup.
//!
//! Both indexes live inside the vault behind a lock and are never handed
//! out; callers see copies.

use std::collections::{BTreeSet, HashMap, HashSet};

use chunkvault_core::{FileManifest, Signature};

/// Filename -> current manifest. Last write wins.
#[derive(Debug, Default)]
pub struct FileIndex {
    files: HashMap<String, FileManifest>,
}

impl FileIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current manifest for `filename`.
    pub fn get(&self, filename: &str) -> Option<&FileManifest> {
        self.files.get(filename)
    }

    /// Whether `filename` is known.
    pub fn contains(&self, filename: &str) -> bool {
        self.files.contains_key(filename)
    }

    /// Insert or replace a manifest, returning the one it replaced.
    pub fn insert(&mut self, manifest: FileManifest) -> Option<FileManifest> {
        self.files.insert(manifest.filename().to_string(), manifest)
    }

    /// All known filenames, sorted.
    pub fn filenames(&self) -> BTreeSet<String> {
        self.files.keys().cloned().collect()
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files are known.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Signatures of every chunk sequence whose chunks were all written.
///
/// Only grows. A hit lets ingest skip chunk writes entirely.
#[derive(Debug, Default)]
pub struct SignatureIndex {
    signatures: HashSet<Signature>,
}

impl SignatureIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `signature` has been recorded.
    pub fn contains(&self, signature: &Signature) -> bool {
        self.signatures.contains(signature)
    }

    /// Record a signature. Returns `true` if it was new.
    pub fn add(&mut self, signature: Signature) -> bool {
        self.signatures.insert(signature)
    }

    /// Number of distinct signatures.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Whether no signatures are recorded.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

/// The vault's process-wide state.
#[derive(Debug, Default)]
pub(crate) struct VaultState {
    pub(crate) files: FileIndex,
    pub(crate) signatures: SignatureIndex,
}
