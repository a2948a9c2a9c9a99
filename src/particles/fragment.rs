use std::collections::VecDeque;
use std::f64::consts::PI;

use crate::assets::image::SourceImage;
use crate::foundation::core::{Affine, Canvas, Point, Rect, Vec2};
use crate::foundation::math::{constrain, lerp, map_range, trunc_count};
use crate::foundation::rng::SceneRng;
use crate::noise::field::NoiseField;
use crate::params::controls::{FragmentControls, PerfLimits};
use crate::render::layer::{ImageSampling, image_paint, premul_bytes_to_pixmap};
use crate::render::painter::Painter;

/// Trail offsets kept per fragment.
pub const MAX_TRAIL: usize = 60;
/// Base count for `seed_initial` (multiplied by the amount control).
pub const INITIAL_FRAGMENTS: f64 = 14.0;
/// Upper bound for [`FragmentSystem::adjust_count`] targets.
pub const MAX_FRAGMENT_TARGET: usize = 20;

/// Square raster cut from the scene image when a fragment spawns.
#[derive(Clone)]
pub struct FragmentRaster {
    side: u32,
    rgba8_premul: Vec<u8>,
    paint: vello_cpu::Image,
}

impl FragmentRaster {
    /// Side length in pixels.
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Premultiplied RGBA8 pixels.
    pub fn data(&self) -> &[u8] {
        &self.rgba8_premul
    }
}

/// Source window for a fragment spawned at `at` with `size` on `canvas`, in image pixels
/// (unclamped). The canvas point maps proportionally into the image.
pub fn source_rect(canvas: Canvas, image: (f64, f64), at: Point, size: f64) -> Rect {
    let side = raster_side(size);
    let cx = at.x / canvas.w() * image.0;
    let cy = at.y / canvas.h() * image.1;
    let half = f64::from(side) / 2.0;
    Rect::new(cx - half, cy - half, cx + half, cy + half)
}

fn raster_side(size: f64) -> u32 {
    if !size.is_finite() {
        return 1;
    }
    size.floor().clamp(1.0, f64::from(u16::MAX)) as u32
}

/// A raster cut from the scene image that wanders around its anchor, leaving a trail.
#[derive(Clone)]
pub struct Fragment {
    anchor: Point,
    raster: FragmentRaster,
    noise_seed: f64,
    step_size: f64,
    radius: f64,
    trail: VecDeque<Vec2>,
    t: f64,
    base_alpha: f64,
}

impl std::fmt::Debug for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fragment")
            .field("anchor", &self.anchor)
            .field("side", &self.raster.side)
            .field("trail", &self.trail.len())
            .finish_non_exhaustive()
    }
}

impl Fragment {
    /// Cut a raster from `image` at canvas point `at`. `None` when the point is off canvas.
    pub fn spawn(
        rng: &mut SceneRng,
        image: &SourceImage,
        canvas: Canvas,
        at: Point,
        size: f64,
    ) -> Option<Self> {
        if !canvas.contains(at) {
            return None;
        }
        let side = raster_side(size);
        let src = source_rect(canvas, image.size(), at, size);
        let rgba8_premul = image.crop(src.x0, src.y0, side, side);
        let pixmap = match premul_bytes_to_pixmap(&rgba8_premul, side, side) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(error = %err, "fragment raster rejected");
                return None;
            }
        };
        let raster = FragmentRaster {
            side,
            rgba8_premul,
            paint: image_paint(pixmap, ImageSampling::Smooth),
        };

        let mut trail = VecDeque::with_capacity(MAX_TRAIL + 1);
        trail.push_back(Vec2::ZERO);
        Some(Self {
            anchor: at,
            raster,
            noise_seed: rng.below(10_000.0),
            step_size: rng.range(5.0, 10.0),
            radius: rng.range(260.0, 380.0),
            trail,
            t: rng.below(1000.0),
            base_alpha: 255.0,
        })
    }

    /// Spawn point on the canvas.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Spawn size as persisted (the raster side).
    pub fn size(&self) -> u32 {
        self.raster.side
    }

    /// The cut raster.
    pub fn raster(&self) -> &FragmentRaster {
        &self.raster
    }

    /// Trail offsets relative to the anchor, oldest first.
    pub fn trail(&self) -> &VecDeque<Vec2> {
        &self.trail
    }

    /// Advance the noise walk and push the new offset onto the trail.
    pub fn update(
        &mut self,
        canvas: Canvas,
        controls: &FragmentControls,
        time_speed: f64,
        noise: &NoiseField,
    ) {
        let speed_mul = controls.speed;
        self.t += 0.022 * time_speed * speed_mul;
        let last = self.trail.back().copied().unwrap_or(Vec2::ZERO);
        let mut angle = map_range(noise.noise2(self.noise_seed, self.t * 0.8), 0.0, 1.0, -PI, PI);

        let step = self.step_size * (0.9 + speed_mul * 0.6);
        let mut next = last + Vec2::new(angle.cos(), angle.sin()) * step;
        if next.hypot() > self.radius {
            next = last * 0.45;
        }

        let global = self.anchor + next;
        if !canvas.contains(global) {
            angle += PI;
            next = last + Vec2::new(angle.cos(), angle.sin()) * self.step_size;
            let g = self.anchor + next;
            let clamped = Point::new(constrain(g.x, 0.0, canvas.w()), constrain(g.y, 0.0, canvas.h()));
            next = clamped - self.anchor;
        }

        self.trail.push_back(next);
        while self.trail.len() > MAX_TRAIL {
            self.trail.pop_front();
        }
    }

    /// Paint the trail and the head, scaled by `size_mul`.
    pub fn draw(&self, painter: &mut Painter, size_mul: f64) {
        let side = f64::from(self.raster.side);
        let size = (side, side);
        let centred = |at: Point, scale: f64| {
            Affine::translate(at.to_vec2())
                * Affine::scale(scale)
                * Affine::translate((-side / 2.0, -side / 2.0))
        };

        painter.draw_image(
            &self.raster.paint,
            size,
            centred(self.anchor, size_mul),
            self.base_alpha / 255.0,
        );

        let n = self.trail.len();
        for (i, offset) in self.trail.iter().enumerate() {
            let t = if n <= 1 { 1.0 } else { i as f64 / (n - 1) as f64 };
            let alpha = self.base_alpha * t.powf(1.15) * 0.95;
            if alpha <= 4.0 {
                continue;
            }
            let scale = lerp(0.7, 1.3, t) * size_mul;
            painter.draw_image(
                &self.raster.paint,
                size,
                centred(self.anchor + *offset, scale),
                alpha / 255.0,
            );
        }
    }
}

/// Persisted fragment shape.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FragmentRecord {
    /// Anchor x.
    pub x: f64,
    /// Anchor y.
    pub y: f64,
    /// Raster side.
    pub size: f64,
}

/// The fragment population and its two growth policies.
#[derive(Clone, Debug, Default)]
pub struct FragmentSystem {
    fragments: Vec<Fragment>,
}

impl FragmentSystem {
    /// Fragment count.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// `true` without fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragments in spawn order.
    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    /// Remove every fragment.
    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    /// Cut one fragment at `at`; `false` when the point is off canvas.
    pub fn spawn_at(
        &mut self,
        rng: &mut SceneRng,
        image: &SourceImage,
        canvas: Canvas,
        at: Point,
        size: f64,
    ) -> bool {
        match Fragment::spawn(rng, image, canvas, at, size) {
            Some(f) => {
                self.fragments.push(f);
                true
            }
            None => false,
        }
    }

    /// Pop from the end while above `target`; spawn at random points while below. The target is
    /// capped at [`MAX_FRAGMENT_TARGET`].
    pub fn adjust_count(
        &mut self,
        target: usize,
        rng: &mut SceneRng,
        image: &SourceImage,
        canvas: Canvas,
    ) {
        let target = target.min(MAX_FRAGMENT_TARGET);
        self.fragments.truncate(target);
        while self.fragments.len() < target {
            let at = Point::new(rng.below(canvas.w()), rng.below(canvas.h()));
            let size = rng.range(90.0, 160.0);
            self.spawn_at(rng, image, canvas, at, size);
        }
    }

    /// Per-frame trickle toward `int(maxFragmentsBase * amount)`.
    pub fn auto_spawn(
        &mut self,
        rng: &mut SceneRng,
        image: &SourceImage,
        canvas: Canvas,
        controls: &FragmentControls,
        perf: &PerfLimits,
    ) {
        let cap = trunc_count(perf.max_fragments_base as f64 * controls.amount);
        if self.fragments.len() >= cap {
            return;
        }
        if rng.chance(0.02 * controls.amount) {
            let at = Point::new(rng.range(0.0, canvas.w()), rng.range(0.0, canvas.h()));
            let size = rng.range(80.0, 150.0);
            self.spawn_at(rng, image, canvas, at, size);
        }
    }

    /// Replace the population with `int(14 * amount)` fresh fragments.
    pub fn seed_initial(
        &mut self,
        rng: &mut SceneRng,
        image: &SourceImage,
        canvas: Canvas,
        controls: &FragmentControls,
    ) {
        self.fragments.clear();
        let count = trunc_count(INITIAL_FRAGMENTS * controls.amount);
        for _ in 0..count {
            let at = Point::new(rng.range(40.0, canvas.w() - 40.0), rng.range(40.0, canvas.h() - 40.0));
            let size = rng.range(100.0, 180.0);
            self.spawn_at(rng, image, canvas, at, size);
        }
    }

    /// Advance every fragment.
    pub fn update(
        &mut self,
        canvas: Canvas,
        controls: &FragmentControls,
        time_speed: f64,
        noise: &NoiseField,
    ) {
        for f in &mut self.fragments {
            f.update(canvas, controls, time_speed, noise);
        }
    }

    /// Paint every fragment.
    pub fn draw(&self, painter: &mut Painter, size_mul: f64) {
        for f in &self.fragments {
            f.draw(painter, size_mul);
        }
    }

    /// Persisted `{x, y, size}` shape of every fragment.
    pub fn records(&self) -> Vec<FragmentRecord> {
        self.fragments
            .iter()
            .map(|f| FragmentRecord {
                x: f.anchor.x,
                y: f.anchor.y,
                size: f64::from(f.size()),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/fragment.rs"]
mod tests;
