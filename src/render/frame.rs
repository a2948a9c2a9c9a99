use crate::foundation::error::{DreamError, DreamResult};

/// One presented frame, premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixels, row-major.
    pub data: Vec<u8>,
    /// `true` when `data` is premultiplied.
    pub premultiplied: bool,
}

impl Frame {
    /// Pixel at `(x, y)`, `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(idx..idx + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixels.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }

    /// Straight-alpha `image` buffer.
    pub fn to_rgba_image(&self) -> DreamResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.to_straight_rgba8())
            .ok_or_else(|| DreamError::render("frame byte length does not match its size"))
    }

    /// Opaque RGB copy: the premultiplied colour composited over black.
    pub fn to_rgb_image(&self) -> DreamResult<image::RgbImage> {
        let over_black: Vec<u8> = if self.premultiplied {
            self.data
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect()
        } else {
            self.data
                .chunks_exact(4)
                .flat_map(|px| {
                    let a = u16::from(px[3]);
                    let m = |c: u8| ((u16::from(c) * a + 127) / 255) as u8;
                    [m(px[0]), m(px[1]), m(px[2])]
                })
                .collect()
        };
        image::RgbImage::from_raw(self.width, self.height, over_black)
            .ok_or_else(|| DreamError::render("frame byte length does not match its size"))
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
