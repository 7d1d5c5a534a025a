//! Growable window of unconsumed bytes owned by the splitter.

use bytes::{Buf, Bytes, BytesMut};

/// Bytes pulled from upstream that have not yet been emitted as a chunk.
///
/// The window only moves forward: `put` appends at the back, `consume`
/// discards from the front. Space released by `consume` is reclaimed by the
/// next `put` that needs it.
#[derive(Debug, Default)]
pub(crate) struct PendingBuffer {
    data: BytesMut,
}

impl PendingBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
        }
    }

    /// Number of bytes currently held.
    pub(crate) fn used(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Appends a block at the back of the window.
    pub(crate) fn put(&mut self, block: &Bytes) {
        self.data.extend_from_slice(block);
    }

    /// Read-only view of the first `n` held bytes.
    pub(crate) fn peek(&self, n: usize) -> &[u8] {
        debug_assert!(n <= self.data.len());
        &self.data[..n]
    }

    /// Permanently discards the first `n` held bytes.
    pub(crate) fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.data.len());
        self.data.advance(n);
    }

    /// Drops every held byte.
    pub(crate) fn clear(&mut self) {
        self.data.clear();
    }

    /// Copies the first `n` bytes out, then consumes them.
    pub(crate) fn take_front(&mut self, n: usize) -> Bytes {
        let out = Bytes::copy_from_slice(self.peek(n));
        self.consume(n);
        out
    }
}
