use crate::foundation::core::{Affine, Canvas, Rgb8, Rgba8};
use crate::foundation::math::map_range;
use crate::noise::field::NoiseField;
use crate::params::palette::{Palette, PaletteRgb};
use crate::params::visual::VisualParams;

/// Guard against runaway loops from pathological steps.
const MAX_STEPS: usize = 1 << 16;

/// Everything a pattern generator reads for one frame.
pub struct GenCtx<'a> {
    /// Canvas being painted.
    pub canvas: Canvas,
    /// Already clamped.
    pub params: VisualParams,
    /// Parsed palette.
    pub palette: PaletteRgb,
    /// Shared noise field.
    pub noise: &'a NoiseField,
    /// Animation time base.
    pub t_base: f64,
}

impl<'a> GenCtx<'a> {
    /// Context with clamped `params`.
    pub fn new(
        canvas: Canvas,
        params: &VisualParams,
        palette: &Palette,
        noise: &'a NoiseField,
        t_base: f64,
    ) -> Self {
        Self {
            canvas,
            params: params.clamped(canvas),
            palette: PaletteRgb::new(palette),
            noise,
            t_base: if t_base.is_finite() { t_base } else { 0.0 },
        }
    }

    /// Canvas width.
    pub fn w(&self) -> f64 {
        self.canvas.w()
    }

    /// Canvas height.
    pub fn h(&self) -> f64 {
        self.canvas.h()
    }

    /// `amplify` remapped to a displacement gain.
    pub fn ctrl_amp(&self) -> f64 {
        map_range(self.params.amplify, 0.0, 120.0, 10.0, self.canvas.max_side() * 0.6)
    }

    /// `frequency` remapped to a noise scale.
    pub fn ctrl_freq(&self) -> f64 {
        map_range(self.params.frequency, 10.0, 100.0, 0.0015, 0.02)
    }

    /// `speed` remapped to a time scale.
    pub fn ctrl_speed(&self) -> f64 {
        map_range(self.params.speed, 0.5, 10.0, 0.001, 0.015)
    }

    /// Half the canvas diagonal.
    pub fn canvas_radius(&self) -> f64 {
        self.w().hypot(self.h()) * 0.7
    }

    /// `noiseSeed` offset.
    pub fn seed(&self) -> f64 {
        self.params.noise_seed
    }

    /// Noise sample offset by the seed.
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.noise.noise3(x, y, z)
    }

    /// Two-dimensional noise sample offset by the seed.
    pub fn noise2(&self, x: f64, y: f64) -> f64 {
        self.noise.noise2(x, y)
    }

    /// `translate(w/2 + offsetX, h/2 + offsetY) · rotate(rotation°) · translate(-w/2, -h/2)`.
    pub fn global_transform(&self) -> Affine {
        let (w, h) = (self.w(), self.h());
        Affine::translate((w / 2.0 + self.params.offset_x, h / 2.0 + self.params.offset_y))
            * Affine::rotate(self.params.rotation.to_radians())
            * Affine::translate((-w / 2.0, -h / 2.0))
    }
}

pub(super) fn rgba(c: Rgb8, alpha: f64) -> Rgba8 {
    c.with_alpha(alpha)
}

/// `start, start + step, ...` while `<= end`.
pub(super) fn up_inclusive(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let n = count(end - start, step, true);
    (0..n).map(move |k| start + k as f64 * step)
}

/// `start, start + step, ...` while `< end`.
pub(super) fn up_exclusive(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let n = count(end - start, step, false);
    (0..n).map(move |k| start + k as f64 * step)
}

/// `start, start - step, ...` while `>= end`.
pub(super) fn down_inclusive(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let n = count(start - end, step, true);
    (0..n).map(move |k| start - k as f64 * step)
}

fn count(span: f64, step: f64, inclusive: bool) -> usize {
    if !(step > 0.0) || !span.is_finite() || !step.is_finite() || span < 0.0 {
        return 0;
    }
    let q = span / step;
    let n = if inclusive {
        q.floor() as usize + 1
    } else if q.fract() == 0.0 {
        q as usize
    } else {
        q.ceil() as usize
    };
    n.min(MAX_STEPS)
}
