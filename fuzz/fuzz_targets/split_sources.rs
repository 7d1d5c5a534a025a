#![no_main]

use std::io::Cursor;

use hashsplit::{BupSplit, Chunk, ChunkSplitter, MultiSourceReader, Source, SplitConfig};
use libfuzzer_sys::fuzz_target;

fn split(sources: Vec<Source>, block_size: usize) -> Vec<Chunk> {
    let reader = MultiSourceReader::new(sources)
        .unwrap()
        .with_block_size(block_size);
    let probe = BupSplit::with_blob_bits(6).unwrap();
    ChunkSplitter::with_probe(reader, probe, SplitConfig::new(6, 2, 512).unwrap())
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fuzz_target!(|input: (Vec<u8>, Vec<u8>, u8)| {
    let (data, cuts, block) = input;

    // Carve `data` into sources at the fuzzer-chosen cut points; repeated
    // cuts give empty sources.
    let mut points: Vec<usize> = cuts
        .iter()
        .map(|&c| if data.is_empty() { 0 } else { c as usize * data.len() / 255 })
        .collect();
    points.sort_unstable();

    let mut sources = Vec::with_capacity(points.len() + 1);
    let mut start = 0;
    for end in points.into_iter().chain(std::iter::once(data.len())) {
        sources.push(Source::reader(Cursor::new(data[start..end].to_vec())));
        start = end;
    }

    let block_size = usize::from(block).max(1);
    let from_sources = split(sources, block_size);
    let whole = split(vec![Source::reader(Cursor::new(data.clone()))], 4096);

    // Verify: source boundaries are invisible to the splitter
    assert_eq!(from_sources, whole);

    let total: usize = from_sources.iter().map(Chunk::len).sum();
    assert_eq!(total, data.len());
});
