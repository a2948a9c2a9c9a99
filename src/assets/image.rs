use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{DreamError, DreamResult};
use crate::foundation::rng::SceneRng;
use crate::render::layer::{ImageSampling, image_paint, premul_bytes_to_pixmap};

/// Samples averaged by [`SourceImage::sample_color`].
const COLOR_SAMPLES: usize = 24;

/// A decoded raster (scene image, helper image or replay thumbnail), premultiplied RGBA8.
///
/// Cloning is cheap: pixels and the prepared paint are shared.
#[derive(Clone)]
pub struct SourceImage {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
    label: Option<String>,
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl SourceImage {
    /// Decode any format the `image` crate understands.
    pub fn decode(bytes: &[u8]) -> DreamResult<Self> {
        let dyn_img = ::image::load_from_memory(bytes).context("decode image from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_straight_rgba8(width, height, rgba.into_raw())
    }

    /// Read and decode an image file.
    pub fn from_path(path: &Path) -> DreamResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read image '{}'", path.display()))?;
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        Ok(Self::decode(&bytes)?.with_label(name))
    }

    /// Image from straight-alpha RGBA8 pixels.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> DreamResult<Self> {
        premultiply_rgba8_in_place(&mut rgba);
        Self::from_premul_rgba8(width, height, rgba)
    }

    /// Image from premultiplied RGBA8 pixels.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> DreamResult<Self> {
        if width == 0 || height == 0 {
            return Err(DreamError::asset("image has zero size"));
        }
        let pixmap = premul_bytes_to_pixmap(&rgba8_premul, width, height)
            .map_err(|e| DreamError::asset(e.to_string()))?;
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            paint: image_paint(pixmap, ImageSampling::Smooth),
            label: None,
        })
    }

    /// Attach a display label.
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size as `(width, height)`.
    pub fn size(&self) -> (f64, f64) {
        (f64::from(self.width), f64::from(self.height))
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Display label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Premultiplied RGBA8 pixels.
    pub fn data(&self) -> &[u8] {
        &self.rgba8_premul
    }

    pub(crate) fn paint(&self) -> &vello_cpu::Image {
        &self.paint
    }

    /// Whether two handles share the same pixel buffer.
    pub fn same_pixels(&self, other: &SourceImage) -> bool {
        Arc::ptr_eq(&self.rgba8_premul, &other.rgba8_premul)
    }

    fn premul_at(&self, x: i64, y: i64) -> [u8; 4] {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return [0, 0, 0, 0];
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let d = &self.rgba8_premul;
        [d[idx], d[idx + 1], d[idx + 2], d[idx + 3]]
    }

    /// Copy the `w × h` window whose top-left corner is `(x0, y0)` (floored), 1:1.
    /// Pixels outside the image stay transparent.
    pub fn crop(&self, x0: f64, y0: f64, w: u32, h: u32) -> Vec<u8> {
        let sx = if x0.is_finite() { x0.floor() as i64 } else { 0 };
        let sy = if y0.is_finite() { y0.floor() as i64 } else { 0 };
        let mut out = Vec::with_capacity(w as usize * h as usize * 4);
        for j in 0..i64::from(h) {
            for i in 0..i64::from(w) {
                out.extend_from_slice(&self.premul_at(sx + i, sy + j));
            }
        }
        out
    }

    /// Average straight colour of 24 random pixels; white for an image with no samples.
    pub fn sample_color(&self, rng: &mut SceneRng) -> [f64; 3] {
        let mut sum = [0.0f64; 3];
        let mut count = 0usize;
        for _ in 0..COLOR_SAMPLES {
            let x = rng.below(f64::from(self.width)).floor() as i64;
            let y = rng.below(f64::from(self.height)).floor() as i64;
            let px = self.premul_at(x, y);
            let straight = unpremultiply(px);
            for (s, c) in sum.iter_mut().zip(straight) {
                *s += f64::from(c);
            }
            count += 1;
        }
        if count == 0 {
            return [255.0; 3];
        }
        sum.map(|s| s / count as f64)
    }
}

/// Multiply every colour channel by `tint / 255` (alpha untouched).
pub(crate) fn tint_premul_in_place(rgba8_premul: &mut [u8], tint: [f64; 3]) {
    let t = tint.map(|c| c.clamp(0.0, 255.0) / 255.0);
    for px in rgba8_premul.chunks_exact_mut(4) {
        for (c, k) in px[..3].iter_mut().zip(t) {
            *c = (f64::from(*c) * k).round() as u8;
        }
    }
}

fn unpremultiply(px: [u8; 4]) -> [u8; 3] {
    let a = u16::from(px[3]);
    if a == 0 {
        return [0, 0, 0];
    }
    if a == 255 {
        return [px[0], px[1], px[2]];
    }
    let un = |c: u8| ((u16::from(c) * 255 + a / 2) / a).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2])]
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image.rs"]
mod tests;
