//! The Chunk type - one `(bytes, level)` record handed to the caller.

use bytes::Bytes;
use std::fmt;

/// How a chunk's end boundary was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    /// The split probe found a content-defined boundary.
    Content,
    /// No boundary within `max_chunk` bytes; the chunk was cut at `max_chunk`.
    Forced,
    /// Input ended; the chunk holds whatever remained buffered.
    Trailing,
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChunkKind::Content => "content",
            ChunkKind::Forced => "forced",
            ChunkKind::Trailing => "trailing",
        };
        f.write_str(name)
    }
}

/// A content-defined chunk with its fan-out level.
///
/// The data is an owned copy, never a view into the splitter's buffer.
///
/// # Example
///
/// ```
/// use hashsplit::{Chunk, ChunkKind};
/// use bytes::Bytes;
///
/// let chunk = Chunk {
///     data: Bytes::from_static(b"hello world"),
///     level: 1,
///     offset: 0,
///     kind: ChunkKind::Content,
/// };
///
/// assert_eq!(chunk.len(), 11);
/// assert_eq!(chunk.range(), 0..11);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk data.
    pub data: Bytes,

    /// Tree level derived from the boundary's checksum strength.
    pub level: i32,

    /// Offset of the first byte within the concatenation of all sources.
    pub offset: u64,

    /// How the end boundary was chosen.
    pub kind: ChunkKind,
}

impl Chunk {
    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a reference to the chunk data.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Returns the tree level.
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Returns the start offset.
    pub fn start(&self) -> u64 {
        self.offset
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    /// Returns the chunk as a range of stream offsets.
    pub fn range(&self) -> std::ops::Range<u64> {
        self.start()..self.end()
    }

    /// Returns true if the probe chose this chunk's boundary.
    pub fn is_content_defined(&self) -> bool {
        self.kind == ChunkKind::Content
    }

    /// Consumes the chunk and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }

    /// Splits the chunk into (data, level).
    pub fn into_parts(self) -> (Bytes, i32) {
        (self.data, self.level)
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chunk({} bytes @ {}, level {}, {})",
            self.len(),
            self.offset,
            self.level,
            self.kind
        )
    }
}
