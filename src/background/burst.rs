use std::f64::consts::TAU;

use crate::foundation::core::Point;
use crate::foundation::math::{lerp, map_range, trunc_count};
use crate::render::display_list::{DrawOp, polyline};

use super::shared::{GenCtx, rgba};

/// Samples per arc edge (the span is walked in tenths of the half-width).
const ARC_SAMPLES: usize = 20;

/// Radial sequence of noise-perturbed wedges around the canvas centre.
pub(super) fn burst(ctx: &GenCtx<'_>) -> Vec<DrawOp> {
    let p = &ctx.params;
    let t = ctx.t_base * ctx.ctrl_speed() * 1.7;
    let center = ctx.canvas.center();
    let max_r = ctx.canvas_radius() * 1.9;
    let bands = trunc_count(map_range(p.waves_amount, 20.0, 300.0, 40.0, 140.0));
    let base_thickness = map_range(p.wave_width, 60.0, 400.0, 0.03, 0.16);
    let denom = bands.saturating_sub(1).max(1) as f64;

    (0..bands)
        .map(|i| {
            let fi = i as f64;
            let u = fi / denom;
            let angle_center = lerp(0.0, TAU, u);
            let n = ctx.noise2(u * 3.0 + ctx.seed() * 0.02, t * 0.4);
            let angle_offset = (n - 0.5) * 0.6 * (p.uniformity / 100.0);
            let span = base_thickness * (1.2 + 1.8 * n);
            let start = angle_center - span;
            let da = span / 10.0;
            let at = |a: f64, r: f64| {
                Point::new(
                    center.x + (a + angle_offset).cos() * r,
                    center.y + (a + angle_offset).sin() * r,
                )
            };

            let outer = (0..=ARC_SAMPLES).map(|k| {
                let a = start + k as f64 * da;
                let r = max_r * (0.75 + 0.45 * (a * 3.0 + t * 0.03).sin() + 0.2 * (t * 0.06 + fi).sin());
                at(a, r)
            });
            let inner = (0..=ARC_SAMPLES).rev().map(|k| {
                let a = start + k as f64 * da;
                let r = max_r * 0.06 * (1.0 + 0.4 * (t * 0.02 + a * 3.0 + fi).sin());
                at(a, r)
            });
            DrawOp::FillPath {
                path: polyline(outer.chain(inner), true),
                color: rgba(ctx.palette.cycle(i), 95.0 + 140.0 * n),
            }
        })
        .collect()
}
