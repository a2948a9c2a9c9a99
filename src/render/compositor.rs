use crate::effects::composite::over_in_place;
use crate::foundation::core::{Affine, Point, Rect, Rgb8, Vec2};
use crate::foundation::error::DreamResult;
use crate::render::frame::Frame;
use crate::render::layer::Layer;
use crate::render::painter::Painter;

/// Fraction of the remaining zoom distance covered per frame.
pub const ZOOM_EASE: f64 = 0.08;
/// Zoomed-in target factor.
pub const ZOOM_IN: f64 = 1.12;

/// Presentation zoom, eased toward a target that toggles between 1.0 and 1.12.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zoom {
    /// Current factor.
    pub factor: f64,
    /// Factor being eased toward.
    pub target: f64,
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            factor: 1.0,
            target: 1.0,
        }
    }
}

impl Zoom {
    /// Ease one frame toward the target.
    pub fn step(&mut self) {
        self.factor += (self.target - self.factor) * ZOOM_EASE;
    }

    /// Switch the target between 1.0 and [`ZOOM_IN`].
    pub fn toggle(&mut self) {
        self.target = if self.target == 1.0 { ZOOM_IN } else { 1.0 };
    }
}

/// Build-mode pointer overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionCursor {
    /// Centre of the square.
    pub at: Point,
    /// Side of the square.
    pub size: f64,
}

/// Stack `layers` bottom-to-top into `dst` (source-over, premultiplied). `dst` is cleared first.
pub fn stack_layers(dst: &mut Layer, layers: &[&Layer]) -> DreamResult<()> {
    dst.clear();
    for layer in layers {
        over_in_place(dst.data_mut(), layer.data(), 1.0)?;
    }
    Ok(())
}

/// Draw the composite scaled by `zoom` about the canvas centre onto a transparent `out`, plus the
/// selection overlay when given, and read the result back as a frame.
pub fn present(
    composite: &Layer,
    out: &mut Layer,
    zoom: f64,
    cursor: Option<SelectionCursor>,
) -> DreamResult<Frame> {
    let canvas = composite.canvas();
    let c = canvas.center().to_vec2();
    let transform =
        Affine::translate(c) * Affine::scale(zoom) * Affine::translate(-c);

    out.clear();
    let mut painter = Painter::for_layer(out);
    let image = composite.to_image()?;
    painter.draw_image(&image, (canvas.w(), canvas.h()), transform, 1.0);

    if let Some(cursor) = cursor {
        painter.set_transform(Affine::IDENTITY);
        let half = Vec2::new(cursor.size / 2.0, cursor.size / 2.0);
        let rect = Rect::from_points(cursor.at - half, cursor.at + half);
        painter.stroke_rect(rect, 1.1, Rgb8::WHITE.with_alpha(210.0));
        painter.fill_circle(cursor.at, 4.0, Rgb8::WHITE.opaque());
    }
    painter.finish(out);

    Ok(out.to_frame())
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
