//! Chunk-boundary engine.
//!
//! - [`ChunkSplitter`] - Pulls blocks from a [`BlockSource`](crate::BlockSource),
//!   probes for split points and yields `(chunk, level)` records

mod engine;

pub use engine::ChunkSplitter;
