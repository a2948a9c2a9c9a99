use kurbo::Shape;

use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgb8, Rgba8};
use crate::render::display_list::{DisplayList, DrawOp};
use crate::render::layer::Layer;

const PATH_TOLERANCE: f64 = 0.1;

/// Immediate-mode painter over one vello CPU render context.
///
/// Paint calls accumulate into the context; [`Painter::finish`] rasterizes them into a layer,
/// replacing its previous contents.
pub struct Painter {
    ctx: vello_cpu::RenderContext,
}

impl Painter {
    /// Painter sized for `layer`. Call [`Painter::finish`] to write the result.
    pub fn for_layer(layer: &Layer) -> Self {
        Self {
            ctx: vello_cpu::RenderContext::new(layer.width(), layer.height()),
        }
    }

    pub(crate) fn ctx_mut(&mut self) -> &mut vello_cpu::RenderContext {
        &mut self.ctx
    }

    /// Transform for subsequent draws.
    pub fn set_transform(&mut self, transform: Affine) {
        self.ctx.set_transform(affine_to_cpu(transform));
    }

    fn set_color(&mut self, color: Rgba8) {
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }

    /// Fill an axis-aligned rect.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.set_color(color);
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Fill a rounded rect.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) {
        if radius <= 0.0 {
            self.fill_rect(rect, color);
            return;
        }
        let path = kurbo::RoundedRect::from_rect(rect, radius).to_path(PATH_TOLERANCE);
        self.fill_path(&path, color);
    }

    /// Fill a path.
    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.set_color(color);
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Stroke a path.
    pub fn stroke_path(&mut self, path: &BezPath, width: f64, color: Rgba8) {
        if color.a == 0 || !(width > 0.0) {
            return;
        }
        self.set_color(color);
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    /// Circle given by its diameter.
    pub fn fill_circle(&mut self, center: Point, diameter: f64, color: Rgba8) {
        if !(diameter > 0.0) {
            return;
        }
        let path = kurbo::Circle::new(center, diameter / 2.0).to_path(PATH_TOLERANCE);
        self.fill_path(&path, color);
    }

    /// Stroke a rect outline.
    pub fn stroke_rect(&mut self, rect: Rect, width: f64, color: Rgba8) {
        self.stroke_path(&rect.to_path(PATH_TOLERANCE), width, color);
    }

    /// Draw `image` (native size `w × h`) under `transform` at `opacity` in `[0, 1]`.
    pub fn draw_image(
        &mut self,
        image: &vello_cpu::Image,
        size: (f64, f64),
        transform: Affine,
        opacity: f64,
    ) {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(image.clone());
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity as f32);
        }
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, size.0, size.1));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
    }

    /// Replay a display list: base fill under identity, then the ops under its transform.
    pub fn paint_display_list(&mut self, list: &DisplayList, width: f64, height: f64) {
        if let Some(base) = list.base {
            self.set_transform(Affine::IDENTITY);
            self.fill_rect(Rect::new(0.0, 0.0, width, height), base.opaque());
        }
        self.set_transform(list.transform);
        for op in &list.ops {
            match op {
                DrawOp::FillPath { path, color } => self.fill_path(path, *color),
                DrawOp::StrokePath { path, width, color } => {
                    self.stroke_path(path, *width, *color)
                }
                DrawOp::Rect {
                    rect,
                    radius,
                    color,
                } => self.fill_rounded_rect(*rect, *radius, *color),
                DrawOp::Circle {
                    center,
                    diameter,
                    color,
                } => self.fill_circle(*center, *diameter, *color),
            }
        }
    }

    /// Rasterize everything painted so far into `layer`, replacing its pixels.
    pub fn finish(mut self, layer: &mut Layer) {
        self.ctx.flush();
        self.ctx.render_to_pixmap(layer.pixmap_mut());
    }
}

/// Paint a whole display list onto `layer` as a full overwrite.
///
/// A list with a base fill yields a fully opaque layer.
pub fn render_display_list(list: &DisplayList, layer: &mut Layer) {
    let (w, h) = (f64::from(layer.width()), f64::from(layer.height()));
    layer.clear();
    let mut painter = Painter::for_layer(layer);
    painter.paint_display_list(list, w, h);
    painter.finish(layer);
    if list.base.is_some() {
        // u8 source-over rounding can leave alpha at 253..254 under translucent ops.
        for px in layer.data_mut().chunks_exact_mut(4) {
            px[3] = 255;
        }
    }
}

/// Solid fill of a whole layer.
pub fn fill_layer(layer: &mut Layer, color: Rgb8) {
    layer.fill(color.opaque().to_premul());
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/painter.rs"]
mod tests;
