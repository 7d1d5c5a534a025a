//! Error types for hashsplit.

use std::io;

/// Errors that can occur while reading sources or splitting chunks.
///
/// End of stream is not an error: operations signal it with `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// A path source could not be opened when the reader reached it.
    #[error("failed to open source {index}: {source}")]
    Open {
        /// Position of the source in the source list.
        index: usize,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// A source's read primitive reported an I/O error.
    #[error("read failed on source {index} at offset {offset}: {source}")]
    Read {
        /// Position of the source in the source list.
        index: usize,
        /// Bytes of this source successfully read before the failure.
        offset: u64,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The split probe reported a boundary outside the window it was given.
    #[error("split probe returned offset {offset} for a {window}-byte window")]
    InvariantViolation {
        /// The offset the probe returned.
        offset: usize,
        /// Length of the window that was probed.
        window: usize,
    },

    /// An earlier call failed; the stream is incomplete and cannot resume.
    #[error("stream is unusable after an earlier failure")]
    Poisoned,

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl SplitError {
    /// Returns the index of the source involved, for I/O failures.
    pub fn source_index(&self) -> Option<usize> {
        match self {
            SplitError::Open { index, .. } | SplitError::Read { index, .. } => Some(*index),
            _ => None,
        }
    }
}
