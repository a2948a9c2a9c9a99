fn clamp_or(v: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if v.is_finite() { v.clamp(lo, hi) } else { fallback }
}

/// Fragment particle controls.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FragmentControls {
    /// Population multiplier, `[0, 3]`.
    pub amount: f64,
    /// Drift speed multiplier, `[0.4, 2.4]`. Also paces helper drift and glitches.
    pub speed: f64,
    /// Draw scale, `[0.3, 3.0]`.
    pub size: f64,
}

impl Default for FragmentControls {
    fn default() -> Self {
        Self {
            amount: 1.0,
            speed: 1.0,
            size: 1.0,
        }
    }
}

impl FragmentControls {
    /// Copy with every field clamped; non-finite values fall back to defaults.
    pub fn clamped(self) -> Self {
        Self {
            amount: clamp_or(self.amount, 0.0, 3.0, 1.0),
            speed: clamp_or(self.speed, 0.4, 2.4, 1.0),
            size: clamp_or(self.size, 0.3, 3.0, 1.0),
        }
    }
}

/// Persisted `visControls` shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VisControls {
    /// Fragment controls.
    pub fragments: FragmentControls,
}

/// Helper image controls.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageControls {
    /// Drift range multiplier, `[0, 2]`.
    pub drift: f64,
    /// Draw scale, `[0.5, 1.8]`.
    pub size: f64,
}

impl Default for ImageControls {
    fn default() -> Self {
        Self {
            drift: 1.0,
            size: 1.0,
        }
    }
}

impl ImageControls {
    /// Copy with every field clamped; non-finite values fall back to defaults.
    pub fn clamped(self) -> Self {
        Self {
            drift: clamp_or(self.drift, 0.0, 2.0, 1.0),
            size: clamp_or(self.size, 0.5, 1.8, 1.0),
        }
    }
}

/// Post-effect settings for the two particle layers.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FxParams {
    /// Fragment layer pixel size, `[1, 40]`.
    pub frag_pixel: f64,
    /// Fragment layer blur passes, `[0, 8]`.
    pub frag_blur: f64,
    /// Helper layer pixel size, `[1, 40]`.
    pub helper_pixel: f64,
    /// Helper layer blur passes, `[0, 8]`.
    pub helper_blur: f64,
}

impl Default for FxParams {
    fn default() -> Self {
        Self {
            frag_pixel: 1.0,
            frag_blur: 0.0,
            helper_pixel: 1.0,
            helper_blur: 0.0,
        }
    }
}

impl FxParams {
    /// Copy with every field clamped; non-finite values fall back to defaults.
    pub fn clamped(self) -> Self {
        Self {
            frag_pixel: clamp_or(self.frag_pixel, 1.0, 40.0, 1.0),
            frag_blur: clamp_or(self.frag_blur, 0.0, 8.0, 0.0),
            helper_pixel: clamp_or(self.helper_pixel, 1.0, 40.0, 1.0),
            helper_blur: clamp_or(self.helper_blur, 0.0, 8.0, 0.0),
        }
    }
}

/// Soft population caps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerfLimits {
    /// Free-hand particle cap.
    pub max_draw_particles: usize,
    /// Base of the auto-spawn fragment cap (times the amount control).
    pub max_fragments_base: usize,
}

impl Default for PerfLimits {
    fn default() -> Self {
        Self {
            max_draw_particles: 260,
            max_fragments_base: 14,
        }
    }
}

/// Smallest selection square.
pub const SELECTION_MIN: f64 = 40.0;
/// Largest selection square.
pub const SELECTION_MAX: f64 = 260.0;
/// Initial selection square.
pub const SELECTION_DEFAULT: f64 = 120.0;

/// Side of the square that a click cuts from the scene image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionSize(f64);

impl SelectionSize {
    /// Side length in pixels.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Wheel input: shrinks by `0.1 * delta`, clamped to `[40, 260]`.
    pub fn wheel(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.0 = (self.0 - delta * 0.1).clamp(SELECTION_MIN, SELECTION_MAX);
    }
}

impl Default for SelectionSize {
    fn default() -> Self {
        Self(SELECTION_DEFAULT)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/controls.rs"]
mod tests;
