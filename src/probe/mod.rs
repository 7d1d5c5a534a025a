//! Split-point probes.
//!
//! A probe looks at a window of bytes and reports the first content-defined
//! boundary in it, together with the boundary's checksum strength.
//!
//! - [`SplitProbe`] - The probe contract
//! - [`Boundary`] - One probe result
//! - [`BupSplit`] - Rolling-checksum probe used by default

mod rollsum;

pub use rollsum::BupSplit;

/// Result of probing one window.
///
/// `offset == 0` means the window holds no boundary. Otherwise
/// `window[..offset]` is a complete chunk and `bits` is the boundary's
/// strength (larger is rarer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Boundary {
    /// Length of the chunk ending at this boundary, or 0.
    pub offset: usize,
    /// Checksum strength. Only meaningful when `offset > 0`.
    pub bits: u32,
}

impl Boundary {
    /// No boundary in the probed window.
    pub const NONE: Boundary = Boundary { offset: 0, bits: 0 };

    /// Creates a boundary at `offset` with strength `bits`.
    pub const fn new(offset: usize, bits: u32) -> Self {
        Self { offset, bits }
    }

    /// Returns true if a boundary was found.
    pub const fn is_found(&self) -> bool {
        self.offset > 0
    }
}

/// Finds the first split point in a window of bytes.
///
/// # Contract
///
/// - The result must depend only on the bytes of `window`. The splitter
///   re-probes a growing window from its start, so a probe that keeps state
///   between calls breaks determinism.
/// - The returned offset must not exceed `window.len()`; the splitter fails
///   with [`SplitError::InvariantViolation`](crate::SplitError) otherwise.
///
/// Closures of type `FnMut(&[u8]) -> Boundary` implement this trait.
pub trait SplitProbe {
    /// Probes `window` and returns the first boundary, or [`Boundary::NONE`].
    fn find_split(&mut self, window: &[u8]) -> Boundary;
}

impl<F> SplitProbe for F
where
    F: FnMut(&[u8]) -> Boundary,
{
    fn find_split(&mut self, window: &[u8]) -> Boundary {
        self(window)
    }
}
