use crate::foundation::core::Point;
use crate::foundation::math::{map_range, trunc_count};
use crate::render::display_list::{DrawOp, polyline};

use super::shared::{GenCtx, rgba, up_inclusive};

const BLOB_RADIUS: f64 = 260.0;
const X_MARGIN: f64 = 200.0;
const X_STEP: f64 = 5.0;

/// Stacked open wave lines, warped around two fixed blobs.
pub(super) fn calm(ctx: &GenCtx<'_>) -> Vec<DrawOp> {
    let p = &ctx.params;
    let (w, h) = (ctx.w(), ctx.h());
    let color = rgba(ctx.palette.cycle(0), 255.0);
    let weight = map_range(p.wave_width, 60.0, 400.0, 1.5, 6.0);
    let t = ctx.t_base * 0.008 * p.speed;
    let num_lines = trunc_count(map_range(p.waves_amount, 20.0, 300.0, 40.0, 140.0));
    let spacing = map_range(p.smoothness, 1.0, 20.0, 26.0, 12.0);
    let amp = map_range(p.amplify, 0.0, 120.0, 10.0, 90.0);
    let freq = map_range(p.frequency, 10.0, 100.0, 0.004, 0.02);
    let blob_strength = map_range(p.uniformity, 0.0, 100.0, 60.0, 240.0);
    let blobs = [
        Point::new(w * 0.32, h * 0.28),
        Point::new(w * 0.65, h * 0.68),
    ];

    (0..num_lines)
        .map(|i| {
            let fi = i as f64;
            let base_y = fi * spacing - h * 0.25 + (fi * 0.12 + t * 4.5).sin() * amp * 0.25;
            let points = up_inclusive(-X_MARGIN, w + X_MARGIN, X_STEP).map(|x| {
                let mut y = base_y
                    + (x * freq + t * 2.0).sin() * (amp * 1.2)
                    + (x * freq * 0.25 + fi * 0.3 + t * 1.5).sin() * (amp * 0.4);
                for b in &blobs {
                    let dist = (x - b.x).hypot(base_y - b.y);
                    if dist < BLOB_RADIUS {
                        let falloff = 1.0 - dist / BLOB_RADIUS;
                        y += falloff.powi(2) * blob_strength;
                    }
                }
                Point::new(x, y)
            });
            DrawOp::StrokePath {
                path: polyline(points, false),
                width: weight,
                color,
            }
        })
        .collect()
}
