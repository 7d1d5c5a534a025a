#![no_main]

use std::io::Cursor;

use hashsplit::{BupSplit, Chunk, ChunkKind, ChunkSplitter, MultiSourceReader, Source, SplitConfig};
use libfuzzer_sys::fuzz_target;

fn split(data: &[u8], block_size: usize, blob_bits: u32, config: SplitConfig) -> Vec<Chunk> {
    let reader = MultiSourceReader::new(vec![Source::reader(Cursor::new(data.to_vec()))])
        .unwrap()
        .with_block_size(block_size);
    let probe = BupSplit::with_blob_bits(blob_bits).unwrap();
    ChunkSplitter::with_probe(reader, probe, config)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fuzz_target!(|data: Vec<u8>| {
    // (blob_bits, config) pairs from tiny to default-sized chunks
    let configs = vec![
        (4, SplitConfig::new(4, 1, 64).unwrap()),
        (8, SplitConfig::new(8, 2, 1024).unwrap()),
        (13, SplitConfig::default()),
    ];

    for (blob_bits, config) in configs {
        let chunks = split(&data, 4096, blob_bits, config);

        // Verify: chunks are bounded and only the last may be trailing
        for (i, chunk) in chunks.iter().enumerate() {
            assert!(!chunk.is_empty());
            assert!(chunk.len() <= config.max_chunk());
            if chunk.kind == ChunkKind::Trailing {
                assert_eq!(i, chunks.len() - 1);
            }
        }

        // Verify: bytes and offsets reassemble the input
        let mut expected_offset = 0u64;
        let mut joined = Vec::with_capacity(data.len());
        for chunk in &chunks {
            assert_eq!(chunk.offset, expected_offset);
            expected_offset += chunk.len() as u64;
            joined.extend_from_slice(&chunk.data);
        }
        assert_eq!(joined, data);

        // Verify: determinism - block size does not move boundaries
        let odd = split(&data, 13, blob_bits, config);
        assert_eq!(chunks, odd);
    }
});
