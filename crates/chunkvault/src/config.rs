//! Vault configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

/// Default chunk size: 1 MiB.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Default upload limit: 64 MiB.
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 64 * 1024 * 1024;

/// What bootstrap does with a manifest record it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptManifestPolicy {
    /// Log a warning, skip the record, keep starting up.
    #[default]
    Skip,
    /// Refuse to start.
    Fail,
}

/// Configuration for the Vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VaultConfig {
    /// Fixed chunk size in bytes. Must be non-zero.
    ///
    /// Changing it does not invalidate stored files, but new uploads of the
    /// same bytes get a different signature and dedupe poorly against old ones.
    pub chunk_size: usize,
    /// Directory holding one blob per unique chunk.
    pub chunk_dir: PathBuf,
    /// Directory holding one `<filename>.json` record per file.
    pub manifest_dir: PathBuf,
    /// Largest accepted upload in bytes. `None` disables the check.
    pub max_upload_size: Option<usize>,
    /// Bootstrap policy for unparseable manifest records.
    pub corrupt_manifests: CorruptManifestPolicy,
    /// Re-hash chunk blobs when reading them back.
    pub verify_chunks_on_read: bool,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self::new("data")
    }
}

impl VaultConfig {
    /// Configuration rooted at `base_dir`, with `chunks/` and `manifests/`
    /// underneath and all other options at their defaults.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let base = base_dir.as_ref();
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_dir: base.join("chunks"),
            manifest_dir: base.join("manifests"),
            max_upload_size: Some(DEFAULT_MAX_UPLOAD_SIZE),
            corrupt_manifests: CorruptManifestPolicy::Skip,
            verify_chunks_on_read: true,
        }
    }

    /// Set the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the upload limit.
    pub fn with_max_upload_size(mut self, limit: Option<usize>) -> Self {
        self.max_upload_size = limit;
        self
    }

    /// Set the corrupt-manifest policy.
    pub fn with_corrupt_manifests(mut self, policy: CorruptManifestPolicy) -> Self {
        self.corrupt_manifests = policy;
        self
    }

    /// Enable or disable verify-on-read for chunk blobs.
    pub fn with_verify_chunks_on_read(mut self, verify: bool) -> Self {
        self.verify_chunks_on_read = verify;
        self
    }

    /// Parse a JSON configuration document and validate it.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| VaultError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the vault cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(VaultError::Config("chunk_size must be greater than zero".into()));
        }
        if self.max_upload_size == Some(0) {
            return Err(VaultError::Config(
                "max_upload_size must be at least 1 byte when set".into(),
            ));
        }
        if self.chunk_dir.as_os_str().is_empty() || self.manifest_dir.as_os_str().is_empty() {
            return Err(VaultError::Config("storage directories must be set".into()));
        }
        if self.chunk_dir == self.manifest_dir {
            return Err(VaultError::Config(
                "chunk_dir and manifest_dir must differ".into(),
            ));
        }
        Ok(())
    }
}
