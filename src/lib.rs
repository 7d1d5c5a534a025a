//! hashsplit
//!
//! The chunking front end of a content-addressed backup pipeline.
//!
//! `hashsplit` reads an ordered list of files and streams as one logical byte
//! stream and cuts it into content-defined chunks, each tagged with a
//! fan-out level for building a hierarchical index tree. Because boundaries
//! follow the content, a byte inserted near the start of a file only changes
//! the chunks around it; everything downstream splits the same way and
//! deduplicates.
//!
//! The crate intentionally:
//! - does NOT hash, compress or store chunks
//! - does NOT build the tree the levels describe
//! - does NOT spawn threads; every call is a blocking pull
//!
//! It only does one thing: **Read sources → yield (chunk, level)**
//!
//! # Example
//!
//! ```no_run
//! use hashsplit::{ChunkSplitter, MultiSourceReader, Source, SplitConfig, SplitError};
//!
//! fn main() -> Result<(), SplitError> {
//!     let sources = ["a.bin", "b.bin"].into_iter().map(Source::open);
//!     let reader = MultiSourceReader::new(sources)?
//!         .with_progress(|index, len| eprintln!("source {index}: +{len} bytes"));
//!
//!     for chunk in ChunkSplitter::new(reader, SplitConfig::default())? {
//!         let chunk = chunk?;
//!         println!("{} bytes at level {}", chunk.len(), chunk.level);
//!     }
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod chunk;
mod config;
mod error;
mod probe;
mod reader;
mod source;
mod splitter;

mod buffer; // internal pending-byte window

#[cfg(test)]
mod proptests;

//
// Public surface
//

pub use chunk::{Chunk, ChunkKind};
pub use config::{
    ADVISE_WINDOW, DEFAULT_BASE_BITS, DEFAULT_BLOCK_SIZE, DEFAULT_FAN_BITS, DEFAULT_MAX_CHUNK,
    SplitConfig,
};
pub use error::SplitError;
pub use probe::{Boundary, BupSplit, SplitProbe};
pub use reader::{BlockSource, MultiSourceReader, ProgressFn};
pub use source::Source;
pub use splitter::ChunkSplitter;
