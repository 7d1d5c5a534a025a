//! Multi-source block reader.
//!
//! [`MultiSourceReader`] walks an ordered list of sources, opening each one
//! only after the previous one has returned end of data, and hands out the
//! bytes as blocks of at most [`DEFAULT_BLOCK_SIZE`] bytes.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use hashsplit::{MultiSourceReader, Source};
//!
//! let sources = vec![
//!     Source::reader(Cursor::new(b"first ".to_vec())),
//!     Source::reader(Cursor::new(Vec::new())),
//!     Source::reader(Cursor::new(b"second".to_vec())),
//! ];
//!
//! let mut reader = MultiSourceReader::new(sources)?;
//! let mut all = Vec::new();
//! while let Some(block) = reader.next_block()? {
//!     all.extend_from_slice(&block);
//! }
//! assert_eq!(all, b"first second");
//! assert!(reader.next_block()?.is_none());
//! # Ok::<(), hashsplit::SplitError>(())
//! ```

use bytes::{Bytes, BytesMut};

use super::BlockSource;
use crate::config::DEFAULT_BLOCK_SIZE;
use crate::error::SplitError;
use crate::source::{ActiveSource, Source};

/// Progress sink: `(source_index, bytes_in_block)`.
pub type ProgressFn = Box<dyn FnMut(usize, usize)>;

/// Reads an ordered sequence of sources as one stream of blocks.
///
/// # Behavior
///
/// - At most one source is open at a time; it is closed as soon as it
///   reports end of data, or when the reader is dropped.
/// - Empty sources are skipped without returning to the caller.
/// - Once `Ok(None)` is returned, every later call returns `Ok(None)`.
/// - After an error the reader is unusable: later calls return
///   [`SplitError::Poisoned`], never `Ok(None)`, so a failed run cannot be
///   mistaken for a complete one.
///
/// One read buffer of `block_size` bytes is kept for the reader's lifetime;
/// each block is copied out of it at its exact length.
///
/// # Progress
///
/// The progress callback reports each block once, at the start of the
/// `next_block()` call that follows it. It is never called before the first
/// block has been read.
pub struct MultiSourceReader<I> {
    sources: I,
    current: Option<ActiveSource>,
    next_index: usize,
    block_size: usize,
    buf: BytesMut,
    last_read: Option<(usize, usize)>,
    progress: Option<ProgressFn>,
    exhausted: bool,
    failed: bool,
}

impl<I> MultiSourceReader<I>
where
    I: Iterator<Item = Source>,
{
    /// Creates a reader and opens the first source.
    ///
    /// An empty source list is not an error; the first `next_block()` then
    /// returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::Open`] if the first source is a path that
    /// cannot be opened.
    pub fn new<S>(sources: S) -> Result<Self, SplitError>
    where
        S: IntoIterator<Item = Source, IntoIter = I>,
    {
        let mut reader = Self {
            sources: sources.into_iter(),
            current: None,
            next_index: 0,
            block_size: DEFAULT_BLOCK_SIZE,
            buf: BytesMut::new(),
            last_read: None,
            progress: None,
            exhausted: false,
            failed: false,
        };
        reader.advance()?;
        Ok(reader)
    }

    /// Installs a progress callback.
    pub fn with_progress(mut self, progress: impl FnMut(usize, usize) + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Overrides the maximum block size (at least 1 byte).
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    /// Returns the index of the source currently open, if any.
    pub fn source_index(&self) -> Option<usize> {
        self.current.as_ref().map(ActiveSource::index)
    }

    /// Returns true once end of stream has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Reads the next block.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(block))` - between 1 and `block_size` bytes
    /// - `Ok(None)` - every source has been read to its end
    /// - `Err(_)` - a source failed to open or read, or an earlier call did
    pub fn next_block(&mut self) -> Result<Option<Bytes>, SplitError> {
        if self.failed {
            return Err(SplitError::Poisoned);
        }

        if let Some((index, len)) = self.last_read.take() {
            if let Some(progress) = self.progress.as_mut() {
                progress(index, len);
            }
        }

        if self.exhausted {
            return Ok(None);
        }

        match self.read_block() {
            Err(e) => {
                self.failed = true;
                self.current = None;
                Err(e)
            }
            ok => ok,
        }
    }

    fn read_block(&mut self) -> Result<Option<Bytes>, SplitError> {
        if let Some(active) = self.current.as_mut() {
            active.advise_behind();
        }

        // Zero-filled only when the block size grows.
        self.buf.resize(self.block_size, 0);

        // Loop rather than recurse: long runs of empty sources must not grow the stack.
        loop {
            let Some(active) = self.current.as_mut() else {
                return Ok(None);
            };

            let n = active.read(&mut self.buf)?;
            if n > 0 {
                self.last_read = Some((active.index(), n));
                return Ok(Some(Bytes::copy_from_slice(&self.buf[..n])));
            }

            active.advise_all();
            tracing::debug!(
                index = active.index(),
                bytes = active.offset(),
                "source exhausted"
            );

            if !self.advance()? {
                return Ok(None);
            }
        }
    }

    /// Closes the current source and opens the next one.
    ///
    /// Returns false, and marks the reader exhausted, when none is left.
    fn advance(&mut self) -> Result<bool, SplitError> {
        self.current = None;

        match self.sources.next() {
            Some(source) => {
                let index = self.next_index;
                self.next_index += 1;
                self.current = Some(ActiveSource::activate(source, index)?);
                Ok(true)
            }
            None => {
                tracing::debug!(sources = self.next_index, "all sources exhausted");
                self.exhausted = true;
                Ok(false)
            }
        }
    }
}

impl<I> BlockSource for MultiSourceReader<I>
where
    I: Iterator<Item = Source>,
{
    fn next_block(&mut self) -> Result<Option<Bytes>, SplitError> {
        MultiSourceReader::next_block(self)
    }
}

impl<I> Iterator for MultiSourceReader<I>
where
    I: Iterator<Item = Source>,
{
    type Item = Result<Bytes, SplitError>;

    /// Yields the first error once, then ends.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.next_block().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::{self, Cursor, Read};
    use std::rc::Rc;

    fn mem(data: &[u8]) -> Source {
        Source::reader(Cursor::new(data.to_vec()))
    }

    fn collect<I: Iterator<Item = Source>>(reader: &mut MultiSourceReader<I>) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(block) = reader.next_block().unwrap() {
            assert!(!block.is_empty());
            out.extend_from_slice(&block);
        }
        out
    }

    #[test]
    fn test_empty_source_list() {
        let mut reader = MultiSourceReader::new(Vec::new()).unwrap();
        assert!(reader.is_exhausted());
        assert!(reader.next_block().unwrap().is_none());
        assert!(reader.next_block().unwrap().is_none());
    }

    #[test]
    fn test_concatenates_in_order() {
        let mut reader =
            MultiSourceReader::new(vec![mem(b"abc"), mem(b""), mem(b"defg"), mem(b"h")]).unwrap();
        assert_eq!(collect(&mut reader), b"abcdefgh");
        assert!(reader.next_block().unwrap().is_none());
    }

    #[test]
    fn test_block_size_limits_reads() {
        let mut reader = MultiSourceReader::new(vec![mem(&[1u8; 10])])
            .unwrap()
            .with_block_size(4);
        let sizes: Vec<usize> = reader.by_ref().map(|b| b.unwrap().len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn test_many_empty_sources() {
        let sources = (0..100_000).map(|_| mem(b""));
        let mut reader = MultiSourceReader::new(sources).unwrap();
        assert!(reader.next_block().unwrap().is_none());
    }

    #[test]
    fn test_lazy_source_iterator() {
        let opened = Rc::new(RefCell::new(0usize));
        let counter = Rc::clone(&opened);
        let sources = (0..3).map(move |i| {
            *counter.borrow_mut() += 1;
            mem(&[i as u8; 2])
        });

        let mut reader = MultiSourceReader::new(sources).unwrap();
        assert_eq!(*opened.borrow(), 1);
        assert_eq!(reader.source_index(), Some(0));

        assert_eq!(&reader.next_block().unwrap().unwrap()[..], &[0, 0]);
        assert_eq!(*opened.borrow(), 1);

        assert_eq!(&reader.next_block().unwrap().unwrap()[..], &[1, 1]);
        assert_eq!(*opened.borrow(), 2);
        assert_eq!(reader.source_index(), Some(1));
    }

    #[test]
    fn test_progress_reports_previous_block() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let mut reader = MultiSourceReader::new(vec![mem(b"abcde"), mem(b""), mem(b"xy")])
            .unwrap()
            .with_block_size(3)
            .with_progress(move |index, len| sink.borrow_mut().push((index, len)));

        reader.next_block().unwrap();
        assert!(calls.borrow().is_empty());

        reader.next_block().unwrap();
        reader.next_block().unwrap();
        assert!(reader.next_block().unwrap().is_none());
        assert!(reader.next_block().unwrap().is_none());

        assert_eq!(*calls.borrow(), vec![(0, 3), (0, 2), (2, 2)]);
    }

    #[test]
    fn test_progress_silent_on_empty_input() {
        let calls = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&calls);
        let mut reader = MultiSourceReader::new(vec![mem(b""), mem(b"")])
            .unwrap()
            .with_progress(move |_, _| *sink.borrow_mut() += 1);

        assert!(reader.next_block().unwrap().is_none());
        assert!(reader.next_block().unwrap().is_none());
        assert_eq!(*calls.borrow(), 0);
    }

    struct FailAfter {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::other("device gone")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_read_failure_is_terminal() {
        let failing = Source::reader(FailAfter {
            data: Cursor::new(b"1234".to_vec()),
        });
        let mut reader = MultiSourceReader::new(vec![mem(b"ok"), failing, mem(b"never")]).unwrap();

        assert_eq!(&reader.next_block().unwrap().unwrap()[..], b"ok");
        assert_eq!(&reader.next_block().unwrap().unwrap()[..], b"1234");

        match reader.next_block() {
            Err(SplitError::Read { index, offset, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(offset, 4);
            }
            other => panic!("expected read error, got {:?}", other),
        }
        assert!(matches!(reader.next_block(), Err(SplitError::Poisoned)));
        assert!(matches!(reader.next_block(), Err(SplitError::Poisoned)));
    }

    #[test]
    fn test_iterator_ends_after_error() {
        let failing = Source::reader(FailAfter {
            data: Cursor::new(b"12".to_vec()),
        });
        let items: Vec<_> = MultiSourceReader::new(vec![failing]).unwrap().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(SplitError::Read { .. })));
    }

    /// Hands out at most 16 bytes per read, like a pipe.
    struct Trickle {
        remaining: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(16).min(self.remaining);
            buf[..n].fill(0xAB);
            self.remaining -= n;
            Ok(n)
        }
    }

    #[test]
    fn test_short_reads_reuse_one_buffer() {
        let mut reader = MultiSourceReader::new(vec![Source::reader(Trickle { remaining: 64 })])
            .unwrap()
            .with_block_size(4096);

        let first = reader.next_block().unwrap().unwrap();
        let buf_ptr = reader.buf.as_ptr();
        assert_eq!(first.len(), 16);
        assert_eq!(reader.buf.len(), 4096);

        let mut blocks = vec![first];
        while let Some(block) = reader.next_block().unwrap() {
            assert_eq!(block.len(), 16);
            assert_eq!(reader.buf.as_ptr(), buf_ptr);
            blocks.push(block);
        }

        // Blocks are detached copies, not views into the shared read buffer.
        assert_eq!(blocks.len(), 4);
        for block in &blocks {
            assert_ne!(block.as_ptr(), buf_ptr);
            assert!(block.iter().all(|&b| b == 0xAB));
        }
    }

    #[test]
    fn test_missing_path_fails_on_reach() {
        let mut reader = MultiSourceReader::new(vec![
            mem(b"data"),
            Source::open("/nonexistent/hashsplit/second.bin"),
        ])
        .unwrap();

        assert!(reader.next_block().unwrap().is_some());
        match reader.next_block() {
            Err(SplitError::Open { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected open error, got {:?}", other),
        }
        assert!(matches!(reader.next_block(), Err(SplitError::Poisoned)));
    }

    #[test]
    fn test_missing_first_path_fails_construction() {
        let result =
            MultiSourceReader::new(vec![Source::open("/nonexistent/hashsplit/first.bin")]);
        assert!(matches!(result, Err(SplitError::Open { index: 0, .. })));
    }
}
