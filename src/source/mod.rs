//! Input byte sources.
//!
//! A [`Source`] is one entry in the ordered list a
//! [`MultiSourceReader`](crate::MultiSourceReader) walks through. Files are
//! read straight from their descriptor and get page-cache advisories as the
//! reader moves past them; any other [`Read`] is read through its own
//! interface.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::Cursor;
//! use hashsplit::Source;
//!
//! let sources = vec![
//!     Source::file(File::open("a.bin")?),
//!     Source::open("b.bin"), // opened when the reader gets to it
//!     Source::reader(Cursor::new(b"inline bytes".to_vec())),
//! ];
//! # Ok::<(), std::io::Error>(())
//! ```

mod advise;

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::config::ADVISE_WINDOW;
use crate::error::SplitError;

/// One input byte provider.
pub struct Source {
    kind: SourceKind,
}

enum SourceKind {
    File(File),
    Path(PathBuf),
    Reader(Box<dyn Read>),
}

impl Source {
    /// A file that is already open.
    pub fn file(file: File) -> Self {
        Self {
            kind: SourceKind::File(file),
        }
    }

    /// A file opened only when the reader reaches it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::Path(path.into()),
        }
    }

    /// Any byte stream. Never receives cache advisories.
    pub fn reader(reader: impl Read + 'static) -> Self {
        Self {
            kind: SourceKind::Reader(Box::new(reader)),
        }
    }

    /// Returns the path of a lazily opened source.
    pub fn path(&self) -> Option<&Path> {
        match &self.kind {
            SourceKind::Path(path) => Some(path),
            _ => None,
        }
    }
}

impl From<File> for Source {
    fn from(file: File) -> Self {
        Self::file(file)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SourceKind::File(file) => f.debug_tuple("Source::File").field(file).finish(),
            SourceKind::Path(path) => f.debug_tuple("Source::Path").field(path).finish(),
            SourceKind::Reader(_) => f.write_str("Source::Reader(..)"),
        }
    }
}

enum Handle {
    File(File),
    Reader(Box<dyn Read>),
}

/// The source currently being read, with its read position.
///
/// Dropping it closes the underlying handle.
pub(crate) struct ActiveSource {
    handle: Handle,
    index: usize,
    offset: u64,
    advised: u64,
}

impl ActiveSource {
    /// Opens `source`, the `index`-th entry of the source list.
    pub(crate) fn activate(source: Source, index: usize) -> Result<Self, SplitError> {
        let handle = match source.kind {
            SourceKind::File(file) => Handle::File(file),
            SourceKind::Path(path) => {
                let file =
                    File::open(&path).map_err(|source| SplitError::Open { index, source })?;
                Handle::File(file)
            }
            SourceKind::Reader(reader) => Handle::Reader(reader),
        };

        tracing::trace!(index, "source activated");
        Ok(Self {
            handle,
            index,
            offset: 0,
            advised: 0,
        })
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    /// Reads up to `buf.len()` bytes. `Ok(0)` is a clean end of this source.
    ///
    /// Interrupted reads are re-issued; any other error is fatal.
    pub(crate) fn read(&mut self, buf: &mut [u8]) -> Result<usize, SplitError> {
        loop {
            let result = match &mut self.handle {
                Handle::File(file) => file.read(buf),
                Handle::Reader(reader) => reader.read(buf),
            };

            match result {
                Ok(n) => {
                    self.offset += n as u64;
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(SplitError::Read {
                        index: self.index,
                        offset: self.offset,
                        source,
                    });
                }
            }
        }
    }

    /// Advises the cache about everything more than [`ADVISE_WINDOW`] behind
    /// the read position that has not been advised yet.
    pub(crate) fn advise_behind(&mut self) {
        if self.offset > ADVISE_WINDOW {
            let upto = self.offset - ADVISE_WINDOW;
            if upto > self.advised {
                self.advise(upto);
            }
        }
    }

    /// Advises the cache about the whole source. Called once it is exhausted.
    pub(crate) fn advise_all(&mut self) {
        if self.offset > self.advised {
            self.advise(self.offset);
        }
    }

    fn advise(&mut self, upto: u64) {
        if let Handle::File(file) = &self.handle {
            tracing::trace!(index = self.index, upto, "dropping cached pages");
            advise::drop_cached(file, upto);
        }
        self.advised = upto;
    }
}
