use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::foundation::core::{Point, Rgb8, Vec2};
use crate::foundation::math::{lerp, map_range};
use crate::foundation::rng::SceneRng;
use crate::noise::field::NoiseField;
use crate::render::painter::Painter;

const ACCEL: f64 = 0.015;
const DAMPING: f64 = 0.985;
const SPEED: f64 = 0.5;
/// Distance between interpolated stroke points, in pixels.
const STROKE_SPACING: f64 = 1.8;

/// One free-hand stroke dot.
#[derive(Clone, Debug)]
pub struct DrawParticle {
    pos: Point,
    vel: Vec2,
    life: f64,
    age: f64,
    size: f64,
    noise_seed: f64,
}

impl DrawParticle {
    /// Spawn a particle near `at` with random drift, size and lifetime.
    pub fn new(rng: &mut SceneRng, at: Point) -> Self {
        Self {
            pos: Point::new(at.x + rng.range(-2.0, 2.0), at.y + rng.range(-2.0, 2.0)),
            vel: Vec2::new(rng.range(-0.35, 0.35), rng.range(-0.35, 0.35)),
            life: rng.range(360.0, 720.0),
            age: 0.0,
            size: rng.range(2.0, 5.0),
            noise_seed: rng.below(10_000.0),
        }
    }

    /// Current position.
    pub fn position(&self) -> Point {
        self.pos
    }

    /// `false` once the particle has outlived its lifetime.
    pub fn is_alive(&self) -> bool {
        self.age < self.life
    }

    /// Advance one frame: noise-steered drift plus velocity.
    pub fn update(&mut self, frame: u64, noise: &NoiseField) {
        self.age += 1.0;
        let angle = noise.noise2(self.noise_seed, frame as f64 * 0.02) * TAU * 2.0;
        self.vel = (self.vel + Vec2::new(angle.cos(), angle.sin()) * ACCEL) * DAMPING;
        self.pos += self.vel * SPEED;
    }

    /// Paint as a fading dot.
    pub fn draw(&self, painter: &mut Painter) {
        let t = self.age / self.life;
        let alpha = 255.0 * (1.0 - t).max(0.0).powf(0.35);
        if alpha <= 4.0 {
            return;
        }
        painter.fill_circle(self.pos, self.size * (1.0 + t * 0.7), Rgb8::WHITE.with_alpha(alpha));
    }
}

/// The free-hand drawing population, capped at `max` particles.
#[derive(Clone, Debug)]
pub struct Sketch {
    particles: VecDeque<DrawParticle>,
    max: usize,
}

impl Sketch {
    /// Empty sketch capped at `max` particles.
    pub fn new(max: usize) -> Self {
        Self {
            particles: VecDeque::new(),
            max,
        }
    }

    /// Live particle count.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// `true` when no particles are alive.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particle cap.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Change the cap, dropping the oldest particles when shrinking.
    pub fn set_max(&mut self, max: usize) {
        self.max = max;
        while self.particles.len() > max {
            self.particles.pop_front();
        }
    }

    /// Particles, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DrawParticle> {
        self.particles.iter()
    }

    /// Drop every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Lay particles along the segment `from → to`, jittered across and along the stroke.
    pub fn drag(
        &mut self,
        rng: &mut SceneRng,
        from: Point,
        to: Point,
        frame: u64,
        noise: &NoiseField,
    ) {
        let d = to - from;
        let steps = ((d.hypot() / STROKE_SPACING) as usize).max(1);
        let heading = d.y.atan2(d.x);
        let across = heading + FRAC_PI_2;
        let f = frame as f64;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let i = i as f64;
            let mut x = lerp(from.x, to.x, t);
            let mut y = lerp(from.y, to.y, t);
            let jitter = map_range(noise.noise1(f * 0.05 + i * 0.3), 0.0, 1.0, -4.0, 4.0);
            x += across.cos() * jitter;
            y += across.sin() * jitter;
            let along = map_range(noise.noise1(f * 0.04 + i * 0.2), 0.0, 1.0, -2.0, 2.0);
            x += heading.cos() * along;
            y += heading.sin() * along;
            if self.max == 0 {
                continue;
            }
            if self.particles.len() >= self.max {
                self.particles.pop_front();
            }
            self.particles.push_back(DrawParticle::new(rng, Point::new(x, y)));
        }
    }

    /// Advance, paint and cull in one pass, as the frame loop does.
    pub fn step(&mut self, painter: &mut Painter, frame: u64, noise: &NoiseField) {
        for p in &mut self.particles {
            p.update(frame, noise);
            p.draw(painter);
        }
        self.particles.retain(DrawParticle::is_alive);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/draw.rs"]
mod tests;
