//! Property-based tests for the reader and splitter.
//!
//! These tests verify pipeline invariants hold for arbitrary inputs:
//!
//! - Concatenated chunks reproduce the input exactly
//! - Chunk boundaries and levels do not depend on upstream block sizes
//! - No chunk exceeds `max_chunk`, and only the last may be trailing
//! - Content-defined levels follow the strength formula

use std::io::Cursor;

use bytes::Bytes;
use proptest::prelude::*;

use crate::chunk::{Chunk, ChunkKind};
use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::probe::{BupSplit, SplitProbe};
use crate::reader::{BlockSource, MultiSourceReader};
use crate::source::Source;
use crate::splitter::ChunkSplitter;

/// Hands out `data` in blocks whose sizes cycle through `sizes`.
struct Sliced {
    data: Bytes,
    pos: usize,
    sizes: Vec<usize>,
    turn: usize,
}

impl BlockSource for Sliced {
    fn next_block(&mut self) -> Result<Option<Bytes>, SplitError> {
        if self.pos >= self.data.len() {
            return Ok(None);
        }
        let size = self.sizes[self.turn % self.sizes.len()];
        self.turn += 1;
        let end = (self.pos + size).min(self.data.len());
        let block = self.data.slice(self.pos..end);
        self.pos = end;
        Ok(Some(block))
    }
}

fn probe() -> BupSplit {
    BupSplit::with_blob_bits(5).unwrap()
}

fn split(data: &[u8], sizes: Vec<usize>, config: SplitConfig) -> Vec<Chunk> {
    let upstream = Sliced {
        data: Bytes::copy_from_slice(data),
        pos: 0,
        sizes,
        turn: 0,
    };
    ChunkSplitter::with_probe(upstream, probe(), config)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn shape(chunks: &[Chunk]) -> Vec<(usize, i32, ChunkKind)> {
    chunks.iter().map(|c| (c.len(), c.level, c.kind)).collect()
}

fn config(max_chunk: usize) -> SplitConfig {
    SplitConfig::new(5, 2, max_chunk).unwrap()
}

proptest! {
    /// Concatenating every chunk gives back the input, with contiguous offsets.
    #[test]
    fn reassembly_preserves_bytes(
        data in prop::collection::vec(any::<u8>(), 0..4096),
        sizes in prop::collection::vec(1usize..600, 1..6),
        max_chunk in 8usize..512,
    ) {
        let chunks = split(&data, sizes, config(max_chunk));

        let mut joined = Vec::with_capacity(data.len());
        let mut expected_offset = 0u64;
        for chunk in &chunks {
            prop_assert!(!chunk.is_empty());
            prop_assert_eq!(chunk.offset, expected_offset);
            expected_offset += chunk.len() as u64;
            joined.extend_from_slice(&chunk.data);
        }
        prop_assert_eq!(joined, data);
    }

    /// Block granularity never changes the (length, level, kind) sequence.
    #[test]
    fn rechunking_is_deterministic(
        data in prop::collection::vec(any::<u8>(), 0..4096),
        sizes in prop::collection::vec(1usize..600, 1..6),
        max_chunk in 8usize..512,
    ) {
        let single_bytes = split(&data, vec![1], config(max_chunk));
        let whole = split(&data, vec![data.len().max(1)], config(max_chunk));
        let mixed = split(&data, sizes, config(max_chunk));

        prop_assert_eq!(shape(&single_bytes), shape(&whole));
        prop_assert_eq!(shape(&mixed), shape(&whole));
    }

    /// Chunks stay within max_chunk; only the last chunk can be trailing.
    #[test]
    fn chunks_respect_max_chunk(
        data in prop::collection::vec(any::<u8>(), 0..4096),
        max_chunk in 1usize..256,
    ) {
        let chunks = split(&data, vec![97], config(max_chunk));

        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert!(chunk.len() <= max_chunk);
            if chunk.kind == ChunkKind::Trailing {
                prop_assert_eq!(i, chunks.len() - 1);
            }
            if chunk.kind == ChunkKind::Forced {
                prop_assert_eq!(chunk.len(), max_chunk);
                prop_assert_eq!(chunk.level, 0);
            }
        }
    }

    /// Re-probing a content chunk finds its own end, with the level it was given.
    #[test]
    fn content_levels_follow_strength(
        data in prop::collection::vec(any::<u8>(), 0..4096),
        base_bits in 0u32..8,
        fan_bits in 1u32..5,
    ) {
        let cfg = SplitConfig::new(base_bits, fan_bits, 1024).unwrap();
        let chunks = split(&data, vec![128], cfg);
        let mut probe = probe();

        for chunk in chunks.iter().filter(|c| c.is_content_defined()) {
            let boundary = probe.find_split(&chunk.data);
            prop_assert_eq!(boundary.offset, chunk.len());
            let delta = i64::from(boundary.bits) - i64::from(base_bits);
            let expected = delta.div_euclid(i64::from(fan_bits)) as i32;
            prop_assert_eq!(chunk.level, expected);
        }
    }

    /// Splitting several sources equals splitting their concatenation.
    #[test]
    fn source_boundaries_are_invisible(
        parts in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..700), 0..6),
        block_size in 1usize..300,
    ) {
        let sources: Vec<Source> = parts
            .iter()
            .map(|p| Source::reader(Cursor::new(p.clone())))
            .collect();
        let reader = MultiSourceReader::new(sources).unwrap().with_block_size(block_size);
        let from_sources: Vec<Chunk> = ChunkSplitter::with_probe(reader, probe(), config(256))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        let flat: Vec<u8> = parts.concat();
        let from_flat = split(&flat, vec![flat.len().max(1)], config(256));

        prop_assert_eq!(from_sources, from_flat);
    }
}
