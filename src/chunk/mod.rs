//! Chunk types.
//!
//! - [`Chunk`] - Chunk bytes with stream offset and tree level
//! - [`ChunkKind`] - How the chunk's end boundary was chosen

mod data;

pub use data::{Chunk, ChunkKind};
