//! Golden test vectors for deterministic verification.
//!
//! Each vector fixes a chunk size and content and lists the Blake3 digest
//! of every chunk. The signature is those digests joined with `-`. Any
//! implementation that stores data compatible with an existing vault must
//! reproduce these exactly.

use chunkvault_core::{ChunkDigest, Chunker, FileManifest, Signature};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Chunk size used to split the content.
    pub chunk_size: usize,
    /// Content bytes.
    pub content: &'static [u8],
    /// Expected chunk digests (hex), in order.
    pub expected_digests: &'static [&'static str],
}

impl GoldenVector {
    /// Expected signature, derived from the expected digests.
    pub fn expected_signature(&self) -> String {
        self.expected_digests.join("-")
    }

    /// Chunk the content and build its manifest.
    pub fn manifest(&self, filename: &str) -> FileManifest {
        let chunker = Chunker::new(self.chunk_size).unwrap_or_else(|e| {
            panic!("vector '{}' has an unusable chunk size: {}", self.name, e)
        });
        FileManifest::new(filename, chunker.digests(self.content))
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "three chunks with a short tail",
            chunk_size: 10,
            content: b"abcdefghijklmnopqrstuvwxy",
            expected_digests: &[
                "d10c2acb518fd74ae130f63e3a452a9a055471164181a63a7d94c182f570349b",
                "5328e30697c1d545a4edbcfd92d4bdec965987e874a25a00dd894b9174c321a3",
                "694f59116f145dd3f34cd09f04727fd737276f88b62607a0fc1e6cf6fc3a4ee3",
            ],
        },
        GoldenVector {
            name: "single chunk smaller than chunk size",
            chunk_size: 1024,
            content: b"hello world",
            expected_digests: &[
                "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24",
            ],
        },
        GoldenVector {
            name: "one-byte tail",
            chunk_size: 5,
            content: b"hello world",
            expected_digests: &[
                "ea8f163db38682925e4491c5e58d4bb3506ef8c14eb78a86e908c5624a67200f",
                "efc76ebffb19e0d766a2c568a6bd020275b663c80a537dfa33106240e4ea2680",
                "d5ede538f628f687e5e0422c7755b503653de2dcd7053ca8791afa5d4787d843",
            ],
        },
        GoldenVector {
            name: "repeated chunk",
            chunk_size: 5,
            content: &[0u8; 10],
            expected_digests: &[
                "cdc96eca844d7912acdbb3dca677757d0db5747a1df61166339cfc7156d4880f",
                "cdc96eca844d7912acdbb3dca677757d0db5747a1df61166339cfc7156d4880f",
            ],
        },
        GoldenVector {
            name: "content exactly one chunk long",
            chunk_size: 10,
            content: &[0u8; 10],
            expected_digests: &[
                "40772e14b7665a8e7f09de41da09c4191acac132a598e4e363d076e19077057a",
            ],
        },
        GoldenVector {
            name: "pangram",
            chunk_size: 1024 * 1024,
            content: b"The quick brown fox jumps over the lazy dog",
            expected_digests: &[
                "2f1514181aadccd913abd94cfa592701a5686ab23f8df1dff1b74710febc6d4a",
            ],
        },
    ]
}

/// Verify every golden vector against the current implementation.
///
/// Returns `(name, matches, computed signature)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let computed = v.manifest("vector").signature().as_str().to_string();
            let matches = computed == v.expected_signature();
            (v.name.to_string(), matches, computed)
        })
        .collect()
}

/// Digest of the empty input. Never a chunk, but pins the hash function.
pub const EMPTY_DIGEST_HEX: &str =
    "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262";

/// Parse the expected digests of a vector.
pub fn expected_digests(vector: &GoldenVector) -> Vec<ChunkDigest> {
    vector
        .expected_digests
        .iter()
        .map(|hex| {
            hex.parse()
                .unwrap_or_else(|e| panic!("vector '{}' has a bad digest: {}", vector.name, e))
        })
        .collect()
}

/// Expected signature of a vector as a typed value.
pub fn expected_signature(vector: &GoldenVector) -> Signature {
    Signature::from_digests(&expected_digests(vector))
}
