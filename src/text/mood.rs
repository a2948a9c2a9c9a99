use std::f64::consts::TAU;

use crate::foundation::core::{Affine, Canvas, Point};
use crate::foundation::error::DreamResult;
use crate::foundation::rng::SceneRng;
use crate::render::painter::{Painter, affine_to_cpu};
use crate::text::layout::{Font, TextBrush, TextLayoutEngine, fill_layout};

/// Lowest mood intensity.
pub const MOOD_INTENSITY_MIN: i64 = 1;
/// Highest mood intensity.
pub const MOOD_INTENSITY_MAX: i64 = 10;
/// Intensity used when none is given.
pub const MOOD_INTENSITY_DEFAULT: i64 = 5;
/// Text size as a fraction of the canvas' shorter side.
pub const MOOD_TEXT_SCALE: f64 = 0.045;

/// Offset and alpha multiplier of each of the four stacked passes.
const PASSES: [((f64, f64), f64); 4] = [
    ((0.0, 0.0), 1.6),
    ((1.5, 1.5), 0.6),
    ((-1.5, -1.5), 0.55),
    ((0.8, -0.8), 0.45),
];

/// Clamp a raw intensity into `1..=10`; non-positive input means the minimum.
pub fn clamp_intensity(v: i64) -> i64 {
    if v <= 0 {
        return MOOD_INTENSITY_MIN;
    }
    v.clamp(MOOD_INTENSITY_MIN, MOOD_INTENSITY_MAX)
}

/// One floating copy of the mood text orbiting its base point.
#[derive(Clone, Debug, PartialEq)]
pub struct MoodSprite {
    /// Orbit centre.
    pub base: Point,
    /// Orbit radius.
    pub radius: f64,
    /// Phase offset of the orbit.
    pub angle_offset: f64,
    /// Phase of the scale pulse.
    pub scale_phase: f64,
    /// Phase of the alpha pulse.
    pub alpha_phase: f64,
    /// Orbit speed multiplier.
    pub speed: f64,
}

impl MoodSprite {
    fn random(rng: &mut SceneRng, canvas: Canvas) -> Self {
        let min_side = canvas.min_side();
        let margin = min_side * 0.15;
        Self {
            base: Point::new(
                rng.range(margin, canvas.w() - margin),
                rng.range(margin, canvas.h() - margin),
            ),
            radius: rng.range(min_side * 0.08, min_side * 0.22),
            angle_offset: rng.below(TAU),
            scale_phase: rng.below(TAU),
            alpha_phase: rng.below(TAU),
            speed: rng.range(0.35, 0.9),
        }
    }

    /// Position, alpha in `[20, 160]` and scale at animation time `t_base`.
    pub fn pose(&self, t_base: f64) -> (Point, f64, f64) {
        let base_time = t_base * 0.01;
        let move_t = base_time * self.speed;
        let at = Point::new(
            self.base.x + (move_t + self.angle_offset).cos() * self.radius,
            self.base.y + (move_t * 0.9 + self.angle_offset * 0.7).sin() * self.radius * 0.6,
        );
        let alpha = 90.0 + 70.0 * (base_time * 0.9 + self.alpha_phase).sin();
        let scale = 0.9 + 0.18 * (base_time * 1.1 + self.scale_phase).sin();
        (at, alpha, scale)
    }
}

/// The mood text overlay: text, intensity, sprites and the shaped line.
pub struct MoodText {
    text: String,
    intensity: i64,
    sprites: Vec<MoodSprite>,
    engine: TextLayoutEngine,
    font: Option<Font>,
    shaped: Option<(String, u32, parley::Layout<TextBrush>)>,
    warned_no_font: bool,
}

impl std::fmt::Debug for MoodText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoodText")
            .field("text", &self.text)
            .field("intensity", &self.intensity)
            .field("sprites", &self.sprites.len())
            .field("font", &self.font)
            .finish_non_exhaustive()
    }
}

impl Default for MoodText {
    fn default() -> Self {
        Self {
            text: String::new(),
            intensity: MOOD_INTENSITY_DEFAULT,
            sprites: Vec::new(),
            engine: TextLayoutEngine::default(),
            font: None,
            shaped: None,
            warned_no_font: false,
        }
    }
}

impl MoodText {
    /// Register font bytes for drawing. Without a font the overlay stays empty.
    pub fn set_font(&mut self, bytes: Vec<u8>) -> DreamResult<()> {
        let font = self.engine.register_font(bytes)?;
        tracing::debug!(family = font.family(), "mood font registered");
        self.font = Some(font);
        self.shaped = None;
        Ok(())
    }

    /// `true` once a font has been registered.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text. Call [`MoodText::rebuild`] afterwards.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Sprite count, `1..=10`.
    pub fn intensity(&self) -> i64 {
        self.intensity
    }

    /// Set the sprite count, clamped to `1..=10`.
    pub fn set_intensity(&mut self, v: i64) {
        self.intensity = clamp_intensity(v);
    }

    /// Current sprites.
    pub fn sprites(&self) -> &[MoodSprite] {
        &self.sprites
    }

    /// Regenerate sprites: `intensity` of them when the trimmed text is non-empty, else none.
    pub fn rebuild(&mut self, rng: &mut SceneRng, canvas: Canvas) {
        self.sprites.clear();
        if self.text.trim().is_empty() {
            return;
        }
        let count = clamp_intensity(self.intensity) as usize;
        self.sprites
            .extend((0..count).map(|_| MoodSprite::random(rng, canvas)));
    }

    /// Paint every sprite's four passes. Returns whether anything was painted.
    pub fn draw(&mut self, painter: &mut Painter, canvas: Canvas, t_base: f64) -> bool {
        let text = self.text.trim();
        if text.is_empty() || self.sprites.is_empty() {
            return false;
        }
        let Some(font) = self.font.as_ref() else {
            if !self.warned_no_font {
                tracing::warn!("mood text set but no font is loaded; overlay stays empty");
                self.warned_no_font = true;
            }
            return false;
        };

        let size_px = (canvas.min_side() * MOOD_TEXT_SCALE) as f32;
        let key_size = size_px.to_bits();
        let stale = !matches!(&self.shaped, Some((t, s, _)) if t == text && *s == key_size);
        if stale {
            match self.engine.layout_line(text, font, size_px) {
                Ok(layout) => self.shaped = Some((text.to_owned(), key_size, layout)),
                Err(err) => {
                    tracing::warn!(error = %err, "mood text layout failed");
                    return false;
                }
            }
        }
        let Some((_, _, layout)) = self.shaped.as_ref() else {
            return false;
        };
        let centre = Affine::translate((
            -f64::from(layout.width()) / 2.0,
            -f64::from(layout.height()) / 2.0,
        ));

        for sprite in &self.sprites {
            let (at, alpha, scale) = sprite.pose(t_base);
            for ((dx, dy), mul) in PASSES {
                let a = (alpha * mul).clamp(0.0, 255.0).round() as u8;
                if a == 0 {
                    continue;
                }
                let transform = Affine::translate(at.to_vec2())
                    * Affine::scale(scale)
                    * Affine::translate((dx, dy))
                    * centre;
                let ctx = painter.ctx_mut();
                ctx.set_transform(affine_to_cpu(transform));
                fill_layout(
                    ctx,
                    layout,
                    font,
                    vello_cpu::peniko::Color::from_rgba8(255, 255, 255, a),
                );
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/mood.rs"]
mod tests;
