//! bup-compatible rolling checksum probe.
//!
//! A 64-byte window rsync-style checksum (two running sums `s1` and `s2`).
//! A boundary falls after any byte where the low `blob_bits` bits of `s2`
//! are all ones; the boundary's strength is `blob_bits` plus the number of
//! further consecutive one bits in the digest, so one boundary in 2^k is at
//! least `k` bits stronger than the weakest.
//!
//! The checksum restarts from its initial state on every call, which makes
//! the result a pure function of the window.

use super::{Boundary, SplitProbe};
use crate::error::SplitError;

/// Default number of low checksum bits that must be set (8 KiB average chunks).
const DEFAULT_BLOB_BITS: u32 = 13;

const WINDOW_BITS: u32 = 7;
const WINDOW_SIZE: usize = 1 << (WINDOW_BITS - 1);
const CHAR_OFFSET: u32 = 31;

#[derive(Debug, Clone)]
struct Rollsum {
    s1: u32,
    s2: u32,
    window: [u8; WINDOW_SIZE],
    wofs: usize,
}

impl Rollsum {
    fn new() -> Self {
        let size = WINDOW_SIZE as u32;
        Self {
            s1: size * CHAR_OFFSET,
            s2: size * (size - 1) * CHAR_OFFSET,
            window: [0; WINDOW_SIZE],
            wofs: 0,
        }
    }

    #[inline]
    fn add(&mut self, drop: u8, add: u8) {
        let size = WINDOW_SIZE as u32;
        self.s1 = self.s1.wrapping_add(u32::from(add)).wrapping_sub(u32::from(drop));
        self.s2 = self
            .s2
            .wrapping_add(self.s1)
            .wrapping_sub(size.wrapping_mul(u32::from(drop) + CHAR_OFFSET));
    }

    #[inline]
    fn roll(&mut self, ch: u8) {
        self.add(self.window[self.wofs], ch);
        self.window[self.wofs] = ch;
        self.wofs = (self.wofs + 1) % WINDOW_SIZE;
    }

    #[inline]
    fn digest(&self) -> u32 {
        (self.s1 << 16) | (self.s2 & 0xffff)
    }
}

/// Rolling-checksum split probe compatible with bup's hashsplit.
///
/// # Example
///
/// ```
/// use hashsplit::{BupSplit, SplitProbe};
///
/// let mut probe = BupSplit::default();
/// let data: Vec<u8> = (0..100_000u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
/// let boundary = probe.find_split(&data);
/// if boundary.is_found() {
///     assert!(boundary.bits >= 13);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BupSplit {
    blob_bits: u32,
}

impl BupSplit {
    /// Creates a probe with the default 13 blob bits.
    pub const fn new() -> Self {
        Self {
            blob_bits: DEFAULT_BLOB_BITS,
        }
    }

    /// Creates a probe that splits when the low `blob_bits` bits are set.
    ///
    /// Smaller values give smaller chunks (average `2^blob_bits` bytes).
    /// Returns error unless `1 <= blob_bits <= 24`.
    pub fn with_blob_bits(blob_bits: u32) -> Result<Self, SplitError> {
        if !(1..=24).contains(&blob_bits) {
            return Err(SplitError::InvalidConfig {
                message: "blob_bits must be between 1 and 24",
            });
        }
        Ok(Self { blob_bits })
    }

    /// Returns the number of checksum bits a boundary needs.
    pub fn blob_bits(&self) -> u32 {
        self.blob_bits
    }

    fn strength(&self, digest: u32) -> u32 {
        let mut rsum = digest >> self.blob_bits;
        let mut bits = self.blob_bits;
        loop {
            rsum >>= 1;
            if rsum & 1 == 0 {
                return bits;
            }
            bits += 1;
        }
    }
}

impl Default for BupSplit {
    fn default() -> Self {
        Self::new()
    }
}

impl SplitProbe for BupSplit {
    fn find_split(&mut self, window: &[u8]) -> Boundary {
        let mask = (1u32 << self.blob_bits) - 1;
        let mut sum = Rollsum::new();

        for (i, &byte) in window.iter().enumerate() {
            sum.roll(byte);
            if sum.s2 & mask == mask {
                return Boundary::new(i + 1, self.strength(sum.digest()));
            }
        }

        Boundary::NONE
    }
}
