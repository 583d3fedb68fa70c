//! Content digests for chunks.
//!
//! A [`ChunkDigest`] is the Blake3 hash of a chunk's bytes. It is both the
//! deduplication key and the on-disk name of the chunk blob (lowercase hex).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Length of a digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Length of a hex-encoded digest.
pub const DIGEST_HEX_LEN: usize = DIGEST_LEN * 2;

/// A 32-byte Blake3 content digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkDigest(pub [u8; DIGEST_LEN]);

impl ChunkDigest {
    /// Compute the digest of the given bytes.
    pub fn of(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex encoding. This is the blob filename on disk.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string.
    ///
    /// Only the canonical lowercase form is accepted, so that a digest has
    /// exactly one spelling in manifests and in the chunk directory.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        if s.len() != DIGEST_HEX_LEN || s.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(CoreError::InvalidDigest(s.to_string()));
        }
        let bytes = hex::decode(s).map_err(|_| CoreError::InvalidDigest(s.to_string()))?;
        let mut arr = [0u8; DIGEST_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Check that `data` hashes to this digest.
    pub fn matches(&self, data: &[u8]) -> bool {
        Self::of(data) == *self
    }
}

impl fmt::Debug for ChunkDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkDigest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ChunkDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ChunkDigest {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for ChunkDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; DIGEST_LEN]> for ChunkDigest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

// Digests travel as hex strings in manifest records.
impl Serialize for ChunkDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChunkDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
