//! File manifests and chunk-sequence signatures.
//!
//! A [`FileManifest`] maps a filename to the ordered digests of its chunks.
//! Its [`Signature`] is the hex digests joined with `-`, so it names one
//! exact chunk sequence. The same bytes chunked at a different size get a
//! different signature.
//!
//! ## Record format
//!
//! Manifests are stored as JSON objects:
//!
//! ```json
//! {
//!   "filename": "report.pdf",
//!   "signature": "<hex>-<hex>-<hex>",
//!   "chunkHashes": ["<hex>", "<hex>", "<hex>"]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::digest::ChunkDigest;
use crate::error::{CoreError, Result};
use crate::filename::sanitize_filename;

/// Separator between digests in a signature.
pub const SIGNATURE_SEPARATOR: char = '-';

/// Identifier of an ordered chunk-digest sequence.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Compute the signature of a digest sequence.
    pub fn from_digests(digests: &[ChunkDigest]) -> Self {
        let mut s = String::with_capacity(digests.len() * 65);
        for (i, digest) in digests.iter().enumerate() {
            if i > 0 {
                s.push(SIGNATURE_SEPARATOR);
            }
            s.push_str(&digest.to_hex());
        }
        Self(s)
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.0.chars();
        let head: String = chars.by_ref().take(16).collect();
        if chars.next().is_some() {
            write!(f, "Signature({}..)", head)
        } else {
            write!(f, "Signature({})", head)
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The durable record of one stored file.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FileManifest {
    filename: String,
    signature: Signature,
    chunk_digests: Vec<ChunkDigest>,
}

/// Wire shape of a manifest record.
#[derive(Serialize, Deserialize)]
struct ManifestRecord {
    filename: String,
    signature: String,
    #[serde(rename = "chunkHashes")]
    chunk_hashes: Vec<ChunkDigest>,
}

impl FileManifest {
    /// Build a manifest, deriving the signature from `chunk_digests`.
    ///
    /// `filename` must already be a sanitized basename.
    pub fn new(filename: impl Into<String>, chunk_digests: Vec<ChunkDigest>) -> Self {
        let signature = Signature::from_digests(&chunk_digests);
        Self {
            filename: filename.into(),
            signature,
            chunk_digests,
        }
    }

    /// The filename this manifest is stored under.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The chunk-sequence signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Chunk digests in file order.
    pub fn chunk_digests(&self) -> &[ChunkDigest] {
        &self.chunk_digests
    }

    /// Number of chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunk_digests.len()
    }

    /// Encode as a JSON record.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let record = ManifestRecord {
            filename: self.filename.clone(),
            signature: self.signature.0.clone(),
            chunk_hashes: self.chunk_digests.clone(),
        };
        serde_json::to_vec_pretty(&record).map_err(|e| CoreError::Encoding(e.to_string()))
    }

    /// Decode and validate a JSON record.
    ///
    /// A record is rejected if it does not parse, if any digest is not
    /// canonical hex, if the filename is not a safe basename, or if the
    /// recorded signature disagrees with its digest list.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let record: ManifestRecord = serde_json::from_slice(bytes)
            .map_err(|e| CoreError::MalformedManifest(e.to_string()))?;

        let filename = sanitize_filename(&record.filename)?;
        if filename != record.filename {
            return Err(CoreError::InvalidFilename(record.filename));
        }

        let manifest = Self::new(filename, record.chunk_hashes);
        if manifest.signature.0 != record.signature {
            return Err(CoreError::SignatureMismatch {
                recorded: record.signature,
                computed: manifest.signature.0,
            });
        }

        Ok(manifest)
    }
}
