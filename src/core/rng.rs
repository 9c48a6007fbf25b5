//! Deterministic, explicitly threaded random number generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Explicit**: The whole generator state is a single `u64` seed that
//!   lives inside the state it randomizes; there is no hidden module state
//! - **Serializable**: Capturing the seed captures the generator
//!
//! Every draw is a pure step `(seed) -> (value, next_seed)`. A fresh
//! ChaCha8 stream is keyed from the current seed, the value is taken from
//! it, and the next seed is the following word of the same stream.
//!
//! ```
//! use wheel_duel::core::SeededRng;
//!
//! let (a, next_a) = SeededRng::step(42);
//! let (b, next_b) = SeededRng::step(42);
//! assert_eq!((a, next_a), (b, next_b));
//! assert_ne!(next_a, 42);
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seeded generator whose full state is its current seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeededRng {
    seed: u64,
}

impl SeededRng {
    /// Create a generator at the given seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// The current seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Pure step: produce a value and the seed that follows it.
    #[must_use]
    pub fn step(seed: u64) -> (u32, u64) {
        let mut inner = ChaCha8Rng::seed_from_u64(seed);
        let value = inner.next_u32();
        (value, inner.next_u64())
    }

    /// Pure step producing a uniform index in `0..len`.
    ///
    /// Returns `None` without consuming the seed when `len` is zero.
    #[must_use]
    pub fn step_index(seed: u64, len: usize) -> (Option<usize>, u64) {
        if len == 0 {
            return (None, seed);
        }
        let mut inner = ChaCha8Rng::seed_from_u64(seed);
        let index = inner.gen_range(0..len);
        (Some(index), inner.next_u64())
    }

    /// Draw a raw value, advancing the seed.
    pub fn next_u32(&mut self) -> u32 {
        let (value, next) = Self::step(self.seed);
        self.seed = next;
        value
    }

    /// Draw an index in `0..len`, advancing the seed.
    ///
    /// An empty range is not a draw: the seed is left untouched.
    pub fn next_index(&mut self, len: usize) -> Option<usize> {
        let (index, next) = Self::step_index(self.seed, len);
        self.seed = next;
        index
    }
}
