use crate::foundation::core::Canvas;

/// Shared parameter set read by every background generator.
///
/// Values are stored as the user (or an archive record) set them; generators always read a
/// [`VisualParams::clamped`] copy.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualParams {
    /// Horizontal offset of the pattern centre.
    pub offset_x: f64,
    /// Vertical offset of the pattern centre.
    pub offset_y: f64,
    /// Degrees.
    pub rotation: f64,
    /// Line and band width.
    pub wave_width: f64,
    /// Line and band density.
    pub waves_amount: f64,
    /// Step size divisor; larger is smoother.
    pub smoothness: f64,
    /// Displacement amplitude.
    pub amplify: f64,
    /// Noise frequency.
    pub frequency: f64,
    /// How similar neighbouring elements are.
    pub uniformity: f64,
    /// Animation speed.
    pub speed: f64,
    /// Offset into the noise field.
    pub noise_seed: f64,
}

impl Default for VisualParams {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            rotation: 0.0,
            wave_width: 250.0,
            waves_amount: 175.0,
            smoothness: 5.0,
            amplify: 92.1,
            frequency: 71.3,
            uniformity: 99.0,
            speed: 5.0,
            noise_seed: 3135.0,
        }
    }
}

/// Clamp range of `waveWidth`.
pub const WAVE_WIDTH_RANGE: (f64, f64) = (60.0, 400.0);
/// Clamp range of `wavesAmount`.
pub const WAVES_AMOUNT_RANGE: (f64, f64) = (20.0, 300.0);
/// Clamp range of `smoothness`.
pub const SMOOTHNESS_RANGE: (f64, f64) = (1.0, 20.0);
/// Clamp range of `amplify`.
pub const AMPLIFY_RANGE: (f64, f64) = (0.0, 120.0);
/// Clamp range of `frequency`.
pub const FREQUENCY_RANGE: (f64, f64) = (10.0, 100.0);
/// Clamp range of `uniformity`.
pub const UNIFORMITY_RANGE: (f64, f64) = (0.0, 100.0);
/// Clamp range of `speed`.
pub const SPEED_RANGE: (f64, f64) = (0.5, 10.0);
/// Clamp range of `noiseSeed`.
pub const NOISE_SEED_RANGE: (f64, f64) = (0.0, 9999.0);
/// Clamp range of `rotation`.
pub const ROTATION_RANGE: (f64, f64) = (-180.0, 180.0);

fn clamp_to(v: f64, (lo, hi): (f64, f64)) -> f64 {
    if v.is_finite() { v.clamp(lo, hi) } else { lo }
}

impl VisualParams {
    /// Copy with every field forced into its documented range for `canvas`.
    ///
    /// Non-finite values fall back to the range minimum.
    pub fn clamped(&self, canvas: Canvas) -> Self {
        let half_w = canvas.w() / 2.0;
        let half_h = canvas.h() / 2.0;
        Self {
            offset_x: clamp_to(self.offset_x, (-half_w, half_w)),
            offset_y: clamp_to(self.offset_y, (-half_h, half_h)),
            rotation: clamp_to(self.rotation, ROTATION_RANGE),
            wave_width: clamp_to(self.wave_width, WAVE_WIDTH_RANGE),
            waves_amount: clamp_to(self.waves_amount, WAVES_AMOUNT_RANGE),
            smoothness: clamp_to(self.smoothness, SMOOTHNESS_RANGE),
            amplify: clamp_to(self.amplify, AMPLIFY_RANGE),
            frequency: clamp_to(self.frequency, FREQUENCY_RANGE),
            uniformity: clamp_to(self.uniformity, UNIFORMITY_RANGE),
            speed: clamp_to(self.speed, SPEED_RANGE),
            noise_seed: clamp_to(self.noise_seed, NOISE_SEED_RANGE),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/visual.rs"]
mod tests;
