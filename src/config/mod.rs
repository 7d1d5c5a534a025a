//! Configuration for splitting behavior.
//!
//! - [`SplitConfig`] - Level derivation and forced-cut threshold
//!
//! # Example
//!
//! ```
//! use hashsplit::SplitConfig;
//!
//! // bup-style tree: 13 base bits, fan-out of 16 per level
//! let config = SplitConfig::new(13, 4, 32 * 1024)?;
//! assert_eq!(config.level_for(21), 2);
//!
//! // Builder pattern
//! let config = SplitConfig::default()
//!     .with_max_chunk(64 * 1024)
//!     .with_forced_level(-1);
//! config.validate()?;
//! # Ok::<(), hashsplit::SplitError>(())
//! ```

use crate::error::SplitError;

/// Default base bits: strength of the weakest boundary the checksum reports.
pub const DEFAULT_BASE_BITS: u32 = 13;

/// Default fan bits (each level groups 2^4 = 16 nodes).
pub const DEFAULT_FAN_BITS: u32 = 4;

/// Default maximum chunk length (32 KiB).
pub const DEFAULT_MAX_CHUNK: usize = 8192 * 4;

/// Default upper bound on a single upstream block (1 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;

/// Bytes of a file kept out of cache advisories behind the read position (1 MiB).
pub const ADVISE_WINDOW: u64 = 1024 * 1024;

/// Configuration for turning split points into `(chunk, level)` pairs.
///
/// - `base_bits` / `fan_bits` map a boundary's checksum strength `B` to a
///   level: `floor((B - base_bits) / fan_bits)`
/// - `max_chunk` bounds every chunk except the trailing one
/// - `forced_level` is assigned to cuts made at `max_chunk`
/// - `trailing_level` is assigned to the remainder emitted at end of input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplitConfig {
    base_bits: u32,
    fan_bits: u32,
    max_chunk: usize,
    forced_level: i32,
    trailing_level: i32,
}

impl SplitConfig {
    /// Creates a new configuration.
    ///
    /// Returns error if `fan_bits` or `max_chunk` is zero.
    pub fn new(base_bits: u32, fan_bits: u32, max_chunk: usize) -> Result<Self, SplitError> {
        let config = Self {
            base_bits,
            fan_bits,
            max_chunk,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the base bits. Not validated.
    pub fn with_base_bits(mut self, bits: u32) -> Self {
        self.base_bits = bits;
        self
    }

    /// Sets the fan bits. Not validated.
    pub fn with_fan_bits(mut self, bits: u32) -> Self {
        self.fan_bits = bits;
        self
    }

    /// Sets the maximum chunk length. Not validated.
    pub fn with_max_chunk(mut self, len: usize) -> Self {
        self.max_chunk = len;
        self
    }

    /// Sets the level given to cuts forced at `max_chunk`.
    pub fn with_forced_level(mut self, level: i32) -> Self {
        self.forced_level = level;
        self
    }

    /// Sets the level given to the final remainder at end of input.
    pub fn with_trailing_level(mut self, level: i32) -> Self {
        self.trailing_level = level;
        self
    }

    /// Returns the base bits.
    pub fn base_bits(&self) -> u32 {
        self.base_bits
    }

    /// Returns the fan bits.
    pub fn fan_bits(&self) -> u32 {
        self.fan_bits
    }

    /// Returns the maximum chunk length.
    pub fn max_chunk(&self) -> usize {
        self.max_chunk
    }

    /// Returns the level for forced cuts.
    pub fn forced_level(&self) -> i32 {
        self.forced_level
    }

    /// Returns the level for the trailing remainder.
    pub fn trailing_level(&self) -> i32 {
        self.trailing_level
    }

    /// Maps a boundary's checksum strength to its tree level.
    ///
    /// Uses floor division, so strengths below `base_bits` give negative
    /// levels rather than rounding towards zero. Levels beyond the `i32`
    /// range saturate.
    ///
    /// ```
    /// use hashsplit::SplitConfig;
    ///
    /// let config = SplitConfig::new(13, 4, 1024)?;
    /// assert_eq!(config.level_for(13), 0);
    /// assert_eq!(config.level_for(16), 0);
    /// assert_eq!(config.level_for(17), 1);
    /// assert_eq!(config.level_for(12), -1);
    /// # Ok::<(), hashsplit::SplitError>(())
    /// ```
    pub fn level_for(&self, strength: u32) -> i32 {
        let delta = i64::from(strength) - i64::from(self.base_bits);
        let level = delta.div_euclid(i64::from(self.fan_bits));
        level.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), SplitError> {
        if self.fan_bits == 0 {
            return Err(SplitError::InvalidConfig {
                message: "fan_bits must be non-zero",
            });
        }

        if self.max_chunk == 0 {
            return Err(SplitError::InvalidConfig {
                message: "max_chunk must be non-zero",
            });
        }

        Ok(())
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            base_bits: DEFAULT_BASE_BITS,
            fan_bits: DEFAULT_FAN_BITS,
            max_chunk: DEFAULT_MAX_CHUNK,
            forced_level: 0,
            trailing_level: 0,
        }
    }
}
