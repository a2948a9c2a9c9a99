use std::f64::consts::TAU;

/// Unclamped linear remap of `v` from `[a0, a1]` into `[b0, b1]`.
///
/// A degenerate source range maps everything to `b0`.
pub fn map_range(v: f64, a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    let span = a1 - a0;
    if span == 0.0 {
        return b0;
    }
    b0 + (v - a0) / span * (b1 - b0)
}

/// `min(max(v, lo), hi)`: never panics, and `hi` wins when the bounds cross. NaN collapses to `lo`.
pub fn constrain(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() {
        return lo;
    }
    v.max(lo).min(hi)
}

/// Linear interpolation.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Truncating float-to-count conversion (`int()` semantics, never negative).
pub fn trunc_count(v: f64) -> usize {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    v.trunc() as usize
}

/// Index into a sequence of `len` items for a unit-interval value, clamped to `len - 1`.
pub fn unit_index(n: f64, len: usize) -> usize {
    if len <= 1 || !n.is_finite() {
        return 0;
    }
    let i = (n.clamp(0.0, 1.0) * len as f64).floor() as usize;
    i.min(len - 1)
}

/// Wrap an angle into `[0, TAU)`.
pub fn wrap_angle(a: f64) -> f64 {
    a.rem_euclid(TAU)
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
