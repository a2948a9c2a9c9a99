use noise::{NoiseFn, Perlin};

const OCTAVES: u32 = 4;
const FALLOFF: f64 = 0.5;
const MAX_BELOW_ONE: f64 = 1.0 - f64::EPSILON;
/// Coordinates beyond this magnitude are folded back onto the 256-cell permutation period.
const FOLD_LIMIT: f64 = 1.0e9;
const LATTICE_PERIOD: f64 = 256.0;

fn fold(c: f64) -> f64 {
    if !c.is_finite() {
        0.0
    } else if c.abs() < FOLD_LIMIT {
        c
    } else {
        c.rem_euclid(LATTICE_PERIOD)
    }
}

/// Seedable coherent noise shared by every generator and particle system.
///
/// Four Perlin octaves with amplitude falloff 0.5, normalized into `[0, 1)`. The only state is
/// the seed; sampling is a pure function of `(seed, x, y, z)`.
#[derive(Clone, Copy, Debug)]
pub struct NoiseField {
    seed: u32,
    perlin: Perlin,
}

impl NoiseField {
    /// Field for `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            perlin: Perlin::new(seed),
        }
    }

    /// Current seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Restart the field from `seed`.
    pub fn reseed(&mut self, seed: u32) {
        *self = Self::new(seed);
    }

    /// Three-dimensional sample in `[0, 1)`. Total over all `f64` inputs.
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        let mut amp = 0.5;
        let mut freq = 1.0;
        let mut sum = 0.0;
        let mut norm = 0.0;
        for _ in 0..OCTAVES {
            let v = self.perlin.get([fold(x * freq), fold(y * freq), fold(z * freq)]);
            sum += amp * (v.clamp(-1.0, 1.0) + 1.0) * 0.5;
            norm += amp;
            amp *= FALLOFF;
            freq *= 2.0;
        }
        let n = if norm > 0.0 { sum / norm } else { 0.5 };
        if n.is_finite() {
            n.clamp(0.0, MAX_BELOW_ONE)
        } else {
            0.5
        }
    }

    /// Two-dimensional sample (`z = 0`).
    pub fn noise2(&self, x: f64, y: f64) -> f64 {
        self.noise3(x, y, 0.0)
    }

    /// One-dimensional sample (`y = z = 0`).
    pub fn noise1(&self, x: f64) -> f64 {
        self.noise3(x, 0.0, 0.0)
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/noise/field.rs"]
mod tests;
