use std::sync::Arc;

use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::foundation::error::{DreamError, DreamResult};
use crate::render::frame::Frame;

/// One full-canvas offscreen surface, premultiplied RGBA8.
pub struct Layer {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl Layer {
    /// Transparent layer; errors when a side exceeds `u16`.
    pub fn new(canvas: Canvas) -> DreamResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| DreamError::render("layer width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| DreamError::render("layer height exceeds u16"))?;
        Ok(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Canvas of this layer's size.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    /// Premultiplied RGBA8 pixels.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Premultiplied RGBA8 pixels, writable.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }

    /// Make every pixel transparent.
    pub fn clear(&mut self) {
        self.fill(Rgba8Premul::transparent());
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Rgba8Premul) {
        let rgba = color.to_array();
        for px in self.data_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Overwrite this layer with `src`. Sizes must match.
    pub fn copy_from(&mut self, src: &Layer) -> DreamResult<()> {
        if src.width != self.width || src.height != self.height {
            return Err(DreamError::render("layer copy size mismatch"));
        }
        self.data_mut().copy_from_slice(src.data());
        Ok(())
    }

    /// Premultiplied pixel at `(x, y)`, transparent when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= u32::from(self.width) || y >= u32::from(self.height) {
            return [0, 0, 0, 0];
        }
        let idx = (y as usize * usize::from(self.width) + x as usize) * 4;
        let d = self.data();
        [d[idx], d[idx + 1], d[idx + 2], d[idx + 3]]
    }

    /// `true` when every pixel is transparent.
    pub fn is_blank(&self) -> bool {
        self.data().chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Snapshot this layer as an image paint (used to place the composite on the frame).
    pub fn to_image(&self) -> DreamResult<vello_cpu::Image> {
        let pixmap = premul_bytes_to_pixmap(
            self.data(),
            u32::from(self.width),
            u32::from(self.height),
        )?;
        Ok(image_paint(pixmap, ImageSampling::Smooth))
    }

    /// Copy of the pixels as a frame.
    pub fn to_frame(&self) -> Frame {
        Frame {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }
}

/// Resampling used when an image paint is scaled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSampling {
    /// Bilinear filtering.
    Smooth,
    /// Nearest neighbour; keeps pixelation crisp.
    Nearest,
}

pub(crate) fn image_paint(pixmap: vello_cpu::Pixmap, sampling: ImageSampling) -> vello_cpu::Image {
    let sampler = match sampling {
        ImageSampling::Smooth => vello_cpu::peniko::ImageSampler::default(),
        ImageSampling::Nearest => vello_cpu::peniko::ImageSampler {
            quality: vello_cpu::peniko::ImageQuality::Low,
            ..vello_cpu::peniko::ImageSampler::default()
        },
    };
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler,
    }
}

pub(crate) fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> DreamResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| DreamError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| DreamError::render("image height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(DreamError::render("image has zero size"));
    }
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(DreamError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/layer.rs"]
mod tests;
