//! Multi-file splitting example.
//!
//! Treats every path on the command line as one continuous stream and
//! prints the chunk boundaries with their tree levels.
//!
//! Run with:
//!     cargo run --example split_files -- /path/to/a /path/to/b

use std::collections::BTreeMap;
use std::env;

use hashsplit::{ChunkKind, ChunkSplitter, MultiSourceReader, Source, SplitConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut paths: Vec<String> = env::args().skip(1).collect();
    if paths.is_empty() {
        paths.push("Cargo.toml".to_string());
    }

    println!("Splitting {} source(s)\n", paths.len());

    let reader = MultiSourceReader::new(paths.iter().map(Source::open))?
        .with_progress(|index, len| eprintln!("  read {:>8} bytes from source {}", len, index));

    // bup's defaults: 13 split bits, 4 bits per tree level, 32 KiB max
    let splitter = ChunkSplitter::new(reader, SplitConfig::default())?;

    let mut total_chunks = 0;
    let mut total_bytes = 0;
    let mut forced = 0;
    let mut per_level: BTreeMap<i32, usize> = BTreeMap::new();

    for chunk in splitter {
        let chunk = chunk?;
        total_chunks += 1;
        total_bytes += chunk.len();
        *per_level.entry(chunk.level).or_default() += 1;
        if chunk.kind == ChunkKind::Forced {
            forced += 1;
        }

        println!(
            "Chunk {}: offset={:>10}, len={:>6}, level={:>2} ({})",
            total_chunks,
            chunk.offset,
            chunk.len(),
            chunk.level,
            chunk.kind
        );
    }

    println!("\nTotal: {} chunks, {} bytes", total_chunks, total_bytes);
    if total_chunks > 0 {
        println!("Average chunk size: {} bytes", total_bytes / total_chunks);
        println!("Forced cuts: {}", forced);
    }
    for (level, count) in &per_level {
        println!("  level {:>2}: {} chunks", level, count);
    }

    Ok(())
}
