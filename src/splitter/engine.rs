//! Core splitting engine - ChunkSplitter with a pull-based API.
//!
//! This module turns a stream of upstream blocks into content-defined
//! chunks:
//!
//! - [`ChunkSplitter`] - Owns the pending buffer and the split probe
//! - `next_chunk()` - Pulls blocks until a boundary is found, then yields one chunk
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use hashsplit::{ChunkSplitter, MultiSourceReader, Source, SplitConfig};
//!
//! let data: Vec<u8> = (0..200_000u32).map(|i| (i.wrapping_mul(2654435761) >> 11) as u8).collect();
//! let reader = MultiSourceReader::new(vec![Source::reader(Cursor::new(data.clone()))])?;
//! let mut splitter = ChunkSplitter::new(reader, SplitConfig::default())?;
//!
//! let mut total = 0;
//! while let Some(chunk) = splitter.next_chunk()? {
//!     assert!(chunk.len() <= 32 * 1024);
//!     total += chunk.len();
//! }
//! assert_eq!(total, data.len());
//! # Ok::<(), hashsplit::SplitError>(())
//! ```

use crate::buffer::PendingBuffer;
use crate::chunk::{Chunk, ChunkKind};
use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::probe::{BupSplit, SplitProbe};
use crate::reader::BlockSource;

/// Splits an upstream byte stream into `(chunk, level)` records.
///
/// # Boundary selection
///
/// Each call probes the first `min(held, max_chunk)` buffered bytes:
///
/// 1. If the probe finds a boundary at `O`, the first `O` bytes become a
///    [`ChunkKind::Content`] chunk with level
///    `floor((bits - base_bits) / fan_bits)`.
/// 2. Otherwise, if at least `max_chunk` bytes are held, the first
///    `max_chunk` bytes become a [`ChunkKind::Forced`] chunk.
/// 3. Otherwise another block is pulled from upstream and the whole window
///    is probed again, since a boundary may straddle two blocks.
///
/// When upstream is exhausted, whatever remains after the last boundary is
/// yielded as one [`ChunkKind::Trailing`] chunk.
///
/// # Determinism
///
/// For a fixed byte stream, probe and config, the sequence of chunks is the
/// same however upstream divides the stream into blocks.
///
/// # Failures
///
/// Upstream errors are returned unchanged. A probe offset beyond the probed
/// window is [`SplitError::InvariantViolation`]. After any error the
/// pending bytes are dropped and every later call returns
/// [`SplitError::Poisoned`], so no partial chunk follows a failure and a
/// failed run never ends in `Ok(None)`.
pub struct ChunkSplitter<S, P = BupSplit> {
    upstream: S,
    probe: P,
    config: SplitConfig,
    pending: PendingBuffer,
    offset: u64,
    upstream_done: bool,
    finished: bool,
    failed: bool,
}

impl<S: BlockSource> ChunkSplitter<S, BupSplit> {
    /// Creates a splitter using the default [`BupSplit`] probe.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidConfig`] if `config` does not validate.
    pub fn new(upstream: S, config: SplitConfig) -> Result<Self, SplitError> {
        Self::with_probe(upstream, BupSplit::new(), config)
    }
}

impl<S: BlockSource, P: SplitProbe> ChunkSplitter<S, P> {
    /// Creates a splitter with a custom probe.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidConfig`] if `config` does not validate.
    /// Nothing is read from `upstream` before validation.
    pub fn with_probe(upstream: S, probe: P, config: SplitConfig) -> Result<Self, SplitError> {
        config.validate()?;

        Ok(Self {
            upstream,
            probe,
            config,
            pending: PendingBuffer::with_capacity(config.max_chunk()),
            offset: 0,
            upstream_done: false,
            finished: false,
            failed: false,
        })
    }

    /// Returns the next chunk, or `None` once all input has been emitted.
    ///
    /// Repeated calls after `None` keep returning `None`; calls after an
    /// error return [`SplitError::Poisoned`].
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, SplitError> {
        if self.failed {
            return Err(SplitError::Poisoned);
        }
        if self.finished {
            return Ok(None);
        }

        match self.advance() {
            Ok(None) => {
                self.finished = true;
                Ok(None)
            }
            Err(e) => {
                self.failed = true;
                self.pending.clear();
                Err(e)
            }
            found => found,
        }
    }

    fn advance(&mut self) -> Result<Option<Chunk>, SplitError> {
        loop {
            if !self.pending.is_empty() {
                if let Some(chunk) = self.split_pending()? {
                    return Ok(Some(chunk));
                }
            }

            if self.upstream_done {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                let len = self.pending.used();
                tracing::debug!(len, offset = self.offset, "emitting trailing chunk");
                let level = self.config.trailing_level();
                return Ok(Some(self.emit(len, level, ChunkKind::Trailing)));
            }

            match self.upstream.next_block()? {
                Some(block) => self.pending.put(&block),
                None => self.upstream_done = true,
            }
        }
    }

    /// Probes the held bytes once and splits off a chunk if a boundary applies.
    fn split_pending(&mut self) -> Result<Option<Chunk>, SplitError> {
        let max = self.config.max_chunk();
        let window = self.pending.used().min(max);
        let boundary = self.probe.find_split(self.pending.peek(window));

        if boundary.offset > window {
            return Err(SplitError::InvariantViolation {
                offset: boundary.offset,
                window,
            });
        }

        if boundary.is_found() {
            let level = self.config.level_for(boundary.bits);
            return Ok(Some(self.emit(boundary.offset, level, ChunkKind::Content)));
        }

        if self.pending.used() >= max {
            tracing::trace!(
                len = max,
                offset = self.offset,
                "no boundary within max_chunk, forcing cut"
            );
            let level = self.config.forced_level();
            return Ok(Some(self.emit(max, level, ChunkKind::Forced)));
        }

        Ok(None)
    }

    /// Copies the first `len` held bytes out and consumes them.
    fn emit(&mut self, len: usize, level: i32, kind: ChunkKind) -> Chunk {
        let data = self.pending.take_front(len);
        let offset = self.offset;
        self.offset += len as u64;

        Chunk {
            data,
            level,
            offset,
            kind,
        }
    }

    /// Returns the number of bytes read from upstream but not yet emitted.
    pub fn pending_len(&self) -> usize {
        self.pending.used()
    }

    /// Returns the stream offset of the next chunk to be emitted.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the configuration used by this splitter.
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Returns a reference to the upstream block source.
    pub fn get_ref(&self) -> &S {
        &self.upstream
    }

    /// Consumes the splitter and returns the upstream block source.
    ///
    /// Bytes still pending are dropped.
    pub fn into_inner(self) -> S {
        self.upstream
    }
}

impl<S: BlockSource, P: SplitProbe> Iterator for ChunkSplitter<S, P> {
    type Item = Result<Chunk, SplitError>;

    /// Yields the first error once, then ends.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.next_chunk().transpose()
    }
}
