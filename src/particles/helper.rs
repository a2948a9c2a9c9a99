use std::f64::consts::TAU;

use crate::assets::image::{SourceImage, tint_premul_in_place};
use crate::assets::pool::ReferencePool;
use crate::foundation::core::{Affine, Canvas, Point};
use crate::foundation::math::{constrain, lerp, map_range, trunc_count};
use crate::foundation::rng::SceneRng;
use crate::noise::field::NoiseField;
use crate::params::controls::{FragmentControls, ImageControls};
use crate::render::layer::{ImageSampling, image_paint, premul_bytes_to_pixmap};
use crate::render::painter::Painter;

/// Helper width as a fraction of the canvas width.
pub const HELPER_WIDTH_FRACTION: f64 = 0.16;
/// Minimum distance of a helper centre from the canvas edge.
pub const HELPER_MARGIN: f64 = 60.0;
/// Helper image opacity, 0..255.
pub const HELPER_ALPHA: f64 = 230.0;
/// Largest helper population.
pub const MAX_HELPERS: usize = 8;

/// Two stacked copies per glitch: offset and alpha multiplier.
const GLITCH_COPIES: [((f64, f64), f64); 2] = [((-2.0, -2.0), 1.1), ((3.0, 1.0), 0.9)];

/// Short-lived blocky echo of a window of the helper image.
#[derive(Clone, Debug)]
pub struct Glitch {
    life: f64,
    age: f64,
    size: f64,
    angle: f64,
    speed: f64,
    offset: (f64, f64),
    t: f64,
}

impl Glitch {
    fn spawn(rng: &mut SceneRng, parent_w: f64, parent_h: f64) -> Self {
        Self {
            life: rng.range(25.0, 45.0),
            age: 0.0,
            size: rng.range(parent_w * 0.12, parent_w * 0.20),
            angle: rng.below(TAU),
            speed: rng.range(1.2, 2.0),
            offset: (
                rng.range(-parent_w * 0.22, parent_w * 0.22),
                rng.range(-parent_h * 0.22, parent_h * 0.22),
            ),
            t: rng.below(1000.0),
        }
    }

    /// `true` once `age > life`.
    pub fn is_dead(&self) -> bool {
        self.age > self.life
    }

    /// Frames lived.
    pub fn age(&self) -> f64 {
        self.age
    }

    /// Lifetime in frames.
    pub fn life(&self) -> f64 {
        self.life
    }

    fn update(&mut self, time_speed: f64, frag_speed: f64, noise: &NoiseField) {
        self.age += 1.0;
        self.t += 0.055 * time_speed * frag_speed;
        let jx = map_range(noise.noise2(self.t, 0.0), 0.0, 1.0, -3.0, 3.0);
        let jy = map_range(noise.noise2(0.0, self.t), 0.0, 1.0, -3.0, 3.0);
        self.offset.0 = (self.offset.0 + jx * self.speed) * 0.97;
        self.offset.1 = (self.offset.1 + jy * self.speed) * 0.97;
    }

    /// Current opacity in `[0, 255]`; the glitch is not drawn at or below 8.
    pub fn alpha(&self) -> f64 {
        210.0 * (1.0 - self.age / self.life)
    }

    fn draw(
        &self,
        painter: &mut Painter,
        rng: &mut SceneRng,
        image: &SourceImage,
        at: Point,
        tint: [f64; 3],
        noise: &NoiseField,
    ) {
        let alpha = self.alpha();
        if alpha <= 8.0 {
            return;
        }
        let t_norm = self.age / self.life;
        let block = self.size * (1.0 + 0.5 * noise.noise1(self.t * 1.1));
        let sample = block * 0.4;
        let (iw, ih) = image.size();
        let sx = rng.below((iw - sample).max(1.0));
        let sy = rng.below((ih - sample).max(1.0));

        let side = (sample.ceil().max(1.0)).min(f64::from(u16::MAX)) as u32;
        let mut window = image.crop(sx, sy, side, side);
        tint_premul_in_place(&mut window, tint);
        let paint = match premul_bytes_to_pixmap(&window, side, side) {
            Ok(p) => image_paint(p, ImageSampling::Nearest),
            Err(err) => {
                tracing::warn!(error = %err, "glitch window rejected");
                return;
            }
        };

        let s = f64::from(side);
        let frame = Affine::translate((at.x + self.offset.0, at.y + self.offset.1))
            * Affine::rotate(self.angle + t_norm * 1.4);
        for ((dx, dy), mul) in GLITCH_COPIES {
            let transform = frame
                * Affine::translate((dx, dy))
                * Affine::scale(block / s)
                * Affine::translate((-s / 2.0, -s / 2.0));
            painter.draw_image(&paint, (s, s), transform, (alpha * mul).min(255.0) / 255.0);
        }
    }
}

/// A pool or uploaded image drifting around a fixed centre, shedding glitches.
#[derive(Clone, Debug)]
pub struct HelperImage {
    image: SourceImage,
    pool_index: Option<usize>,
    pool_name: Option<String>,
    w: f64,
    h: f64,
    centre: Point,
    pos: Point,
    noise_seed_x: f64,
    noise_seed_y: f64,
    t: f64,
    base_color: [f64; 3],
    glitches: Vec<Glitch>,
}

impl HelperImage {
    /// Place `image` at a random spot with a random scale and sampled base colour.
    pub fn new(rng: &mut SceneRng, image: SourceImage, canvas: Canvas) -> Self {
        let target_w = canvas.w() * HELPER_WIDTH_FRACTION;
        let scale = rng.range(0.65, 1.0);
        let w = target_w * scale;
        let h = (target_w / image.aspect()) * scale;
        let centre = Point::new(
            rng.range(HELPER_MARGIN, canvas.w() - HELPER_MARGIN),
            rng.range(HELPER_MARGIN, canvas.h() - HELPER_MARGIN),
        );
        let noise_seed_x = rng.below(10_000.0);
        let noise_seed_y = rng.below(20_000.0);
        let t = rng.below(1000.0);
        let base_color = image.sample_color(rng);
        Self {
            image,
            pool_index: None,
            pool_name: None,
            w,
            h,
            centre,
            pos: centre,
            noise_seed_x,
            noise_seed_y,
            t,
            base_color,
            glitches: Vec::new(),
        }
    }

    /// Tag the helper with its reference pool slot.
    pub fn with_pool_entry(mut self, index: usize, name: Option<String>) -> Self {
        self.pool_index = Some(index);
        self.pool_name = name;
        self
    }

    /// The wrapped image.
    pub fn image(&self) -> &SourceImage {
        &self.image
    }

    /// Reference pool slot, when the image came from the pool.
    pub fn pool_index(&self) -> Option<usize> {
        self.pool_index
    }

    /// Reference pool file name, when the image came from the pool.
    pub fn pool_name(&self) -> Option<&str> {
        self.pool_name.as_deref()
    }

    /// Drawn width and height.
    pub fn size(&self) -> (f64, f64) {
        (self.w, self.h)
    }

    /// Home position the helper drifts around.
    pub fn centre(&self) -> Point {
        self.centre
    }

    /// Current drifted position.
    pub fn position(&self) -> Point {
        self.pos
    }

    /// Average colour of the image, `0..255` per channel.
    pub fn base_color(&self) -> [f64; 3] {
        self.base_color
    }

    /// Live glitch copies.
    pub fn glitches(&self) -> &[Glitch] {
        &self.glitches
    }

    /// Drift, age glitches and maybe spawn a new one.
    pub fn update(
        &mut self,
        rng: &mut SceneRng,
        canvas: Canvas,
        frag: &FragmentControls,
        image_ctrl: &ImageControls,
        time_speed: f64,
        noise: &NoiseField,
    ) {
        self.t += 0.045 * time_speed * frag.speed;
        let drift = image_ctrl.drift;
        let dx = map_range(noise.noise2(self.noise_seed_x, self.t), 0.0, 1.0, -70.0 * drift, 70.0 * drift);
        let dy = map_range(noise.noise2(self.noise_seed_y, self.t), 0.0, 1.0, -60.0 * drift, 60.0 * drift);
        let micro_x = 6.0 * (self.t * 4.3).sin();
        let micro_y = 5.0 * (self.t * 3.7).cos();

        let margin = self.w * 0.55;
        self.pos = Point::new(
            constrain(self.centre.x + dx + micro_x, margin, canvas.w() - margin),
            constrain(self.centre.y + dy + micro_y, margin, canvas.h() - margin),
        );

        if rng.chance(0.07 * frag.amount) {
            self.glitches.push(Glitch::spawn(rng, self.w, self.h));
        }
        for g in &mut self.glitches {
            g.update(time_speed, frag.speed, noise);
        }
        self.glitches.retain(|g| !g.is_dead());
    }

    /// Paint the image and its glitch copies.
    pub fn draw(
        &self,
        painter: &mut Painter,
        rng: &mut SceneRng,
        image_ctrl: &ImageControls,
        noise: &NoiseField,
    ) {
        let (iw, ih) = self.image.size();
        let (dw, dh) = (self.w * image_ctrl.size, self.h * image_ctrl.size);
        let transform = Affine::translate((self.pos.x - dw / 2.0, self.pos.y - dh / 2.0))
            * Affine::scale_non_uniform(dw / iw, dh / ih);
        painter.draw_image(self.image.paint(), (iw, ih), transform, HELPER_ALPHA / 255.0);

        let tint = self.base_color.map(|c| lerp(255.0, c, 0.7));
        for g in &self.glitches {
            g.draw(painter, rng, &self.image, self.pos, tint, noise);
        }
    }
}

/// Persisted helper reference: positional pool index (-1 when not from the pool) and stable name.
#[derive(Clone, Debug, PartialEq)]
pub struct HelperRef {
    /// Pool slot, `-1` for images outside the pool.
    pub index: i64,
    /// Pool file name, when known.
    pub name: Option<String>,
}

/// The helper population.
#[derive(Clone, Debug, Default)]
pub struct HelperSystem {
    helpers: Vec<HelperImage>,
}

impl HelperSystem {
    /// Helper count.
    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    /// `true` without helpers.
    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    /// Helpers in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, HelperImage> {
        self.helpers.iter()
    }

    /// Remove every helper.
    pub fn clear(&mut self) {
        self.helpers.clear();
    }

    /// Append a helper.
    pub fn push(&mut self, helper: HelperImage) {
        self.helpers.push(helper);
    }

    /// Pop extras; add random pool images while below `target` (clamped to `1..=8`).
    pub fn adjust_count(
        &mut self,
        target: f64,
        rng: &mut SceneRng,
        pool: &ReferencePool,
        canvas: Canvas,
    ) {
        let target = trunc_count(target).clamp(1, MAX_HELPERS);
        self.helpers.truncate(target);
        while self.helpers.len() < target {
            let Some(index) = pool.random(rng) else {
                break;
            };
            let Some(image) = pool.get(index) else {
                break;
            };
            let name = pool.name(index).map(str::to_owned);
            let helper = HelperImage::new(rng, image.clone(), canvas).with_pool_entry(index, name);
            self.helpers.push(helper);
        }
    }

    /// Rebuild every helper from its image for a new canvas, keeping pool tags.
    pub fn rebuild(&mut self, rng: &mut SceneRng, canvas: Canvas) {
        let old = std::mem::take(&mut self.helpers);
        for h in old {
            let mut fresh = HelperImage::new(rng, h.image, canvas);
            fresh.pool_index = h.pool_index;
            fresh.pool_name = h.pool_name;
            self.helpers.push(fresh);
        }
    }

    /// Advance every helper.
    pub fn update(
        &mut self,
        rng: &mut SceneRng,
        canvas: Canvas,
        frag: &FragmentControls,
        image_ctrl: &ImageControls,
        time_speed: f64,
        noise: &NoiseField,
    ) {
        for h in &mut self.helpers {
            h.update(rng, canvas, frag, image_ctrl, time_speed, noise);
        }
    }

    /// Paint every helper.
    pub fn draw(
        &self,
        painter: &mut Painter,
        rng: &mut SceneRng,
        image_ctrl: &ImageControls,
        noise: &NoiseField,
    ) {
        for h in &self.helpers {
            h.draw(painter, rng, image_ctrl, noise);
        }
    }

    /// Pool references of every helper, for persistence.
    pub fn refs(&self) -> Vec<HelperRef> {
        self.helpers
            .iter()
            .map(|h| HelperRef {
                index: h.pool_index.map_or(-1, |i| i as i64),
                name: h.pool_name.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/helper.rs"]
mod tests;
