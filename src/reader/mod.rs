//! Sequential reading across an ordered list of sources.
//!
//! - [`BlockSource`] - Anything that hands out raw byte blocks
//! - [`MultiSourceReader`] - Reads each [`Source`](crate::Source) to its end, in order

mod multi;

pub use multi::{MultiSourceReader, ProgressFn};

use bytes::Bytes;

use crate::error::SplitError;

/// Upstream of a [`ChunkSplitter`](crate::ChunkSplitter).
///
/// `Ok(None)` is end of stream and must be terminal: once returned, every
/// later call returns it too.
pub trait BlockSource {
    /// Returns the next non-empty block, or `None` once all input is consumed.
    fn next_block(&mut self) -> Result<Option<Bytes>, SplitError>;
}

impl<B: BlockSource + ?Sized> BlockSource for &mut B {
    fn next_block(&mut self) -> Result<Option<Bytes>, SplitError> {
        (**self).next_block()
    }
}

impl<B: BlockSource + ?Sized> BlockSource for Box<B> {
    fn next_block(&mut self) -> Result<Option<Bytes>, SplitError> {
        (**self).next_block()
    }
}
