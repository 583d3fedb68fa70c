//! Proptest generators for property-based testing.

use proptest::prelude::*;

use chunkvault_core::ChunkDigest;

/// Generate a random ChunkDigest.
pub fn chunk_digest() -> impl Strategy<Value = ChunkDigest> {
    any::<[u8; 32]>().prop_map(ChunkDigest::from_bytes)
}

/// Generate a small but useful chunk size.
pub fn chunk_size() -> impl Strategy<Value = usize> {
    prop_oneof![Just(1usize), 1usize..=64, Just(4096usize)]
}

/// Generate non-empty content of at most `max_len` bytes.
pub fn content(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=max_len.max(1))
}

/// Generate content built from a small alphabet of repeated blocks, so that
/// chunk-level deduplication actually kicks in.
pub fn repetitive_content(block: usize, max_blocks: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..4, 1..=max_blocks.max(1)).prop_map(move |picks| {
        picks
            .into_iter()
            .flat_map(|p| std::iter::repeat(b'a' + p).take(block))
            .collect()
    })
}

/// Generate a filename that sanitizes to itself.
///
/// The leading character is never a dot, so `.` and `..` cannot appear.
pub fn filename() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_][a-zA-Z0-9_. -]{0,40}".prop_map(String::from)
}

/// Generate a filename with a directory prefix that sanitization strips.
pub fn prefixed_filename() -> impl Strategy<Value = (String, String)> {
    (
        prop::collection::vec("[a-z]{1,8}", 1..4),
        prop_oneof![Just('/'), Just('\\')],
        filename(),
    )
        .prop_map(|(dirs, sep, name)| {
            let sep = sep.to_string();
            let raw = format!("{}{}{}", dirs.join(sep.as_str()), sep, name);
            (raw, name)
        })
}

/// Parameters for an ingest.
#[derive(Debug, Clone)]
pub struct IngestCase {
    pub filename: String,
    pub chunk_size: usize,
    pub content: Vec<u8>,
}

impl Arbitrary for IngestCase {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (filename(), chunk_size(), content(512))
            .prop_map(|(filename, chunk_size, content)| IngestCase {
                filename,
                chunk_size,
                content,
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunkvault_core::{sanitize_filename, Chunker};

    proptest! {
        #[test]
        fn test_digest_hex_round_trip(digest in chunk_digest()) {
            let hex = digest.to_hex();
            prop_assert_eq!(hex.len(), 64);
            prop_assert_eq!(ChunkDigest::from_hex(&hex).unwrap(), digest);
        }

        #[test]
        fn test_generated_filenames_are_clean(name in filename()) {
            prop_assert_eq!(sanitize_filename(&name).unwrap(), name);
        }

        #[test]
        fn test_prefixed_filenames_strip((raw, name) in prefixed_filename()) {
            prop_assert_eq!(sanitize_filename(&raw).unwrap(), name);
        }

        #[test]
        fn test_repetitive_content_repeats_digests(data in repetitive_content(8, 32)) {
            let chunker = Chunker::new(8).unwrap();
            let digests = chunker.digests(&data);
            let unique: std::collections::HashSet<_> = digests.iter().collect();
            prop_assert!(unique.len() <= 4);
        }

        #[test]
        fn test_ingest_case_chunks_cover_content(case: IngestCase) {
            let chunker = Chunker::new(case.chunk_size).unwrap();
            let chunks = chunker.chunk(case.content.clone());
            let total: usize = chunks.iter().map(|c| c.len()).sum();
            prop_assert_eq!(total, case.content.len());
        }
    }
}
