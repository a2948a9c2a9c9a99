use crate::foundation::core::Rect;
use crate::foundation::math::{lerp, map_range};
use crate::render::display_list::DrawOp;

use super::shared::{GenCtx, rgba};

const SKIP_BELOW: f64 = 0.12;
const INSET: f64 = 4.0;

/// Quantized block grid; some cells double in width or height and every cell pulses.
pub(super) fn blocks(ctx: &GenCtx<'_>) -> Vec<DrawOp> {
    let p = &ctx.params;
    let t = ctx.t_base * ctx.ctrl_speed() * 1.1;
    let cell = map_range(p.smoothness, 1.0, 20.0, 70.0, 26.0);
    let cols = (ctx.w() / cell).ceil() as usize + 2;
    let rows = (ctx.h() / cell).ceil() as usize + 2;
    let seed_offset = ctx.seed() * 0.2;

    let mut ops = Vec::new();
    for gy in 0..rows {
        for gx in 0..cols {
            let (fx, fy) = (gx as f64, gy as f64);
            let seed = ctx.noise2(fx * 0.15 + seed_offset, fy * 0.15 + seed_offset);
            if seed < SKIP_BELOW {
                continue;
            }
            let (mut w, mut h) = (cell, cell);
            if seed > 0.65 && seed < 0.82 {
                w = cell * 2.0;
            } else if seed >= 0.82 {
                h = cell * 2.0;
            }
            let pulse = (t * 1.7 + seed * 6.0).sin() * 0.5 + 0.5;
            let alpha = lerp(140.0, 255.0, pulse);
            let scale = lerp(0.97, 1.05, pulse);
            let drift_x = (fx * 15.0 + t * 40.0 + seed * 200.0).sin() * 2.4;
            let drift_y = (fy * 19.0 + t * 37.0 + seed * 180.0).cos() * 2.4;
            let cx = fx * cell + drift_x + w / 2.0;
            let cy = fy * cell + drift_y + h / 2.0;
            let x0 = cx - w / 2.0 * scale;
            let y0 = cy - h / 2.0 * scale;
            ops.push(DrawOp::Rect {
                rect: Rect::new(x0, y0, x0 + (w - INSET) * scale, y0 + (h - INSET) * scale),
                radius: 0.0,
                color: rgba(ctx.palette.for_noise(seed), alpha),
            });
        }
    }
    ops
}
