use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Upper bound (exclusive) for persisted replay seeds.
pub const SEED_SPACE: f64 = 999_999.0;

/// Seedable uniform random source shared by every spawn and construction step.
///
/// ChaCha8 keeps the stream identical across platforms and processes, which is what makes a
/// reseed-before-reconstruction replay reproducible.
#[derive(Clone, Debug)]
pub struct SceneRng {
    seed: u64,
    inner: ChaCha8Rng,
}

impl SceneRng {
    /// Stream for `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Restart the stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// Seed the current stream was started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// Uniform value in `[lo, hi)`; tolerates `lo >= hi` by returning values between them.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.random()
    }

    /// Uniform value in `[0, hi)`.
    pub fn below(&mut self, hi: f64) -> f64 {
        self.range(0.0, hi)
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.random() < p
    }

    /// Uniform index into a sequence of `len` items.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.inner.random_range(0..len))
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    /// Fresh seed for a persisted record, in `[0, 999999)`.
    pub fn next_seed(&mut self) -> u32 {
        self.below(SEED_SPACE).floor() as u32
    }
}

impl Default for SceneRng {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
