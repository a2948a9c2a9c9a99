//! Backend-agnostic drawing commands produced by the background generators.

use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgb8, Rgba8};

/// One drawing command in local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Filled closed path.
    FillPath {
        /// Outline.
        path: BezPath,
        /// Fill colour.
        color: Rgba8,
    },
    /// Open polyline stroke.
    StrokePath {
        /// Polyline.
        path: BezPath,
        /// Stroke width in pixels.
        width: f64,
        /// Stroke colour.
        color: Rgba8,
    },
    /// Axis-aligned rect; `radius > 0` rounds the corners.
    Rect {
        /// Bounds.
        rect: Rect,
        /// Corner radius.
        radius: f64,
        /// Fill colour.
        color: Rgba8,
    },
    /// Filled circle.
    Circle {
        /// Centre point.
        center: Point,
        /// Diameter in pixels.
        diameter: f64,
        /// Fill colour.
        color: Rgba8,
    },
}

impl DrawOp {
    /// Paint colour of the op.
    pub fn color(&self) -> Rgba8 {
        match self {
            DrawOp::FillPath { color, .. }
            | DrawOp::StrokePath { color, .. }
            | DrawOp::Rect { color, .. }
            | DrawOp::Circle { color, .. } => *color,
        }
    }
}

/// A full overwrite of one layer: optional solid base fill, then `ops` under `transform`.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayList {
    /// `None` leaves the layer transparent under the ops.
    pub base: Option<Rgb8>,
    /// Transform applied to every op.
    pub transform: Affine,
    /// Ops in paint order.
    pub ops: Vec<DrawOp>,
}

impl DisplayList {
    /// Empty list over an optional opaque base fill.
    pub fn new(base: Option<Rgb8>) -> Self {
        Self {
            base,
            transform: Affine::IDENTITY,
            ops: Vec::new(),
        }
    }

    /// Replace the transform.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Append an op.
    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// Op count.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// `true` without ops.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Every op's points, in pre-transform space. Used for finiteness checks.
    pub fn points(&self) -> Vec<Point> {
        let mut out = Vec::new();
        for op in &self.ops {
            match op {
                DrawOp::FillPath { path, .. } | DrawOp::StrokePath { path, .. } => {
                    for el in path.elements() {
                        out.extend(el_points(*el));
                    }
                }
                DrawOp::Rect { rect, .. } => {
                    out.push(Point::new(rect.x0, rect.y0));
                    out.push(Point::new(rect.x1, rect.y1));
                }
                DrawOp::Circle { center, .. } => out.push(*center),
            }
        }
        out
    }
}

fn el_points(el: kurbo::PathEl) -> Vec<Point> {
    use kurbo::PathEl;
    match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => vec![p],
        PathEl::QuadTo(a, b) => vec![a, b],
        PathEl::CurveTo(a, b, c) => vec![a, b, c],
        PathEl::ClosePath => Vec::new(),
    }
}

/// Build a polyline through `points`; closed when `close` is set.
pub fn polyline(points: impl IntoIterator<Item = Point>, close: bool) -> BezPath {
    let mut path = BezPath::new();
    let mut first = true;
    for p in points {
        if first {
            path.move_to(p);
            first = false;
        } else {
            path.line_to(p);
        }
    }
    if close && !first {
        path.close_path();
    }
    path
}
