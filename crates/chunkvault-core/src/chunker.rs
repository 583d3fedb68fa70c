//! Fixed-size chunking.
//!
//! Boundaries are byte offsets that are multiples of the chunk size. This is
//! not content-defined chunking: inserting a byte near the front of a file
//! shifts every later boundary.

use bytes::Bytes;

use crate::digest::ChunkDigest;
use crate::error::{CoreError, Result};

/// One piece of a file together with its content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// `blake3(data)`.
    pub digest: ChunkDigest,
    /// Byte offset within the source buffer.
    pub offset: u64,
    /// The chunk bytes. Shares the source buffer, no copy is made.
    pub data: Bytes,
}

impl Chunk {
    /// Build a chunk from bytes, computing its digest.
    pub fn new(offset: u64, data: Bytes) -> Self {
        Self {
            digest: ChunkDigest::of(&data),
            offset,
            data,
        }
    }

    /// Number of bytes in the chunk.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the chunk is empty. Never true for chunks produced by [`Chunker`].
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Splits buffers into chunks of a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    chunk_size: usize,
}

impl Chunker {
    /// Create a chunker. Fails if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(CoreError::InvalidChunkSize);
        }
        Ok(Self { chunk_size })
    }

    /// The configured chunk size in bytes.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks a buffer of `len` bytes splits into.
    pub fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }

    /// Split `data` into chunks and hash each one.
    ///
    /// Every chunk is exactly `chunk_size` bytes except the last, which holds
    /// the remainder. Empty input yields no chunks.
    pub fn chunk(&self, data: impl Into<Bytes>) -> Vec<Chunk> {
        let data: Bytes = data.into();
        let mut chunks = Vec::with_capacity(self.chunk_count(data.len()));

        let mut start = 0usize;
        while start < data.len() {
            let end = usize::min(start + self.chunk_size, data.len());
            chunks.push(Chunk::new(start as u64, data.slice(start..end)));
            start = end;
        }

        chunks
    }

    /// Ordered digests of `data`'s chunks, without retaining the bytes.
    pub fn digests(&self, data: &[u8]) -> Vec<ChunkDigest> {
        data.chunks(self.chunk_size).map(ChunkDigest::of).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(matches!(Chunker::new(0), Err(CoreError::InvalidChunkSize)));
    }

    #[test]
    fn test_chunk_empty_data() {
        let chunker = Chunker::new(1024).unwrap();
        assert!(chunker.chunk(Bytes::new()).is_empty());
        assert!(chunker.digests(b"").is_empty());
    }

    #[test]
    fn test_chunk_exactly_chunk_size() {
        let chunker = Chunker::new(16).unwrap();
        let data = vec![0xABu8; 16];
        let chunks = chunker.chunk(data.clone());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].data.as_ref(), data.as_slice());
        assert_eq!(chunks[0].offset, 0);
    }

    #[test]
    fn test_chunk_twenty_five_by_ten() {
        let chunker = Chunker::new(10).unwrap();
        let data: Vec<u8> = (0u8..25).collect();
        let chunks = chunker.chunk(data.clone());

        let lens: Vec<usize> = chunks.iter().map(Chunk::len).collect();
        assert_eq!(lens, vec![10, 10, 5]);
        assert_eq!(chunks[2].offset, 20);
        assert_eq!(chunks[2].data.as_ref(), &data[20..]);
    }

    #[test]
    fn test_identical_chunks_share_digest() {
        let chunker = Chunker::new(4).unwrap();
        let chunks = chunker.chunk(vec![b'A'; 8]);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].digest, chunks[1].digest);
    }

    #[test]
    fn test_digests_match_chunks() {
        let chunker = Chunker::new(7).unwrap();
        let data = b"the quick brown fox jumps over the lazy dog".to_vec();
        let from_chunks: Vec<ChunkDigest> =
            chunker.chunk(data.clone()).iter().map(|c| c.digest).collect();
        assert_eq!(from_chunks, chunker.digests(&data));
    }

    #[test]
    fn test_insert_at_front_shifts_boundaries() {
        let chunker = Chunker::new(8).unwrap();
        let original = b"0123456789abcdef0123456789abcdef".to_vec();
        let mut shifted = vec![b'!'];
        shifted.extend_from_slice(&original);

        let a = chunker.digests(&original);
        let b = chunker.digests(&shifted);
        assert!(a.iter().all(|d| !b.contains(d)));
    }

    proptest! {
        #[test]
        fn prop_chunks_cover_input(
            data in prop::collection::vec(any::<u8>(), 0..2048),
            size in 1usize..300,
        ) {
            let chunker = Chunker::new(size).unwrap();
            let chunks = chunker.chunk(data.clone());

            prop_assert_eq!(chunks.len(), chunker.chunk_count(data.len()));
            if let Some((last, body)) = chunks.split_last() {
                prop_assert!(body.iter().all(|c| c.len() == size));
                prop_assert!(last.len() >= 1 && last.len() <= size);
            }

            let joined: Vec<u8> = chunks.iter().flat_map(|c| c.data.iter().copied()).collect();
            prop_assert_eq!(joined, data);
        }

        #[test]
        fn prop_chunking_is_deterministic(
            data in prop::collection::vec(any::<u8>(), 0..1024),
            size in 1usize..128,
        ) {
            let chunker = Chunker::new(size).unwrap();
            prop_assert_eq!(chunker.digests(&data), chunker.digests(&data));
        }
    }
}
