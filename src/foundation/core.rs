use crate::foundation::error::{DreamError, DreamResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Pixel dimensions of the main canvas and every offscreen layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Validate and build a canvas. Layers are backed by `u16`-sized pixmaps.
    pub fn new(width: u32, height: u32) -> DreamResult<Self> {
        if width == 0 || height == 0 {
            return Err(DreamError::validation("canvas width and height must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(DreamError::validation(format!(
                "canvas {width}x{height} exceeds the {} px layer limit",
                u16::MAX
            )));
        }
        Ok(Self { width, height })
    }

    /// Width as `f64`.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// Centre point.
    pub fn center(self) -> Point {
        Point::new(self.w() / 2.0, self.h() / 2.0)
    }

    /// `min(width, height)` as `f64`.
    pub fn min_side(self) -> f64 {
        self.w().min(self.h())
    }

    /// `max(width, height)` as `f64`.
    pub fn max_side(self) -> f64 {
        self.w().max(self.h())
    }

    /// Whether `p` lies inside the canvas, edges included.
    pub fn contains(self, p: Point) -> bool {
        p.x >= 0.0 && p.x <= self.w() && p.y >= 0.0 && p.y <= self.h()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 960,
            height: 640,
        }
    }
}

/// Opaque 8-bit RGB colour (the persisted `bgColor` shape).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb8 {
    /// Opaque black.
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    /// Opaque white.
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Attach an alpha given on the 0..255 float scale used by the generators.
    pub fn with_alpha(self, alpha: f64) -> Rgba8 {
        Rgba8 {
            r: self.r,
            g: self.g,
            b: self.b,
            a: alpha_u8(alpha),
        }
    }

    /// Fully opaque RGBA.
    pub fn opaque(self) -> Rgba8 {
        self.with_alpha(255.0)
    }
}

/// Straight (non-premultiplied) RGBA8 paint colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Premultiply.
    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red, premultiplied.
    pub r: u8,
    /// Green, premultiplied.
    pub g: u8,
    /// Blue, premultiplied.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// All zeros.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Premultiply a straight-alpha colour.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// `[r, g, b, a]`.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Convert a 0..255 float alpha (possibly out of range or NaN) to `u8`.
pub fn alpha_u8(alpha: f64) -> u8 {
    if !alpha.is_finite() {
        return 0;
    }
    alpha.clamp(0.0, 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
