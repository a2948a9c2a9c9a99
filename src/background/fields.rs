use crate::foundation::core::{Point, Rect};
use crate::foundation::math::map_range;
use crate::render::display_list::DrawOp;

use super::shared::{GenCtx, rgba, up_exclusive};

/// Jittered grid of rounded squares.
pub(super) fn pixels(ctx: &GenCtx<'_>) -> Vec<DrawOp> {
    let p = &ctx.params;
    let (w, h) = (ctx.w(), ctx.h());
    let t = ctx.t_base * ctx.ctrl_speed();
    let freq = ctx.ctrl_freq() * 1.3;
    let step = map_range(p.smoothness, 1.0, 20.0, 26.0, 8.0);
    let wobble = ctx.ctrl_amp() * 0.03;
    let size = map_range(p.wave_width, 60.0, 400.0, step * 0.5, step * 1.6);
    let seed = ctx.seed();

    let mut ops = Vec::new();
    for x in up_exclusive(-20.0, w + 20.0, step) {
        for y in up_exclusive(-20.0, h + 20.0, step) {
            let n = ctx.noise3(x * freq + seed, y * freq + seed * 1.3, t * 2.0);
            let dx = (n - 0.5) * wobble;
            let dy = ((x + y) * 0.01 + t * 60.0).sin() * wobble * 0.35;
            let alpha = 40.0 + 150.0 * (1.0 - (n - 0.5).abs() * 2.0);
            let (x0, y0) = (x + dx, y + dy);
            ops.push(DrawOp::Rect {
                rect: Rect::new(x0, y0, x0 + size, y0 + size),
                radius: 3.0,
                color: rgba(ctx.palette.for_noise(n), alpha),
            });
        }
    }
    ops
}

/// Soft field of overlapping circles.
pub(super) fn cloud(ctx: &GenCtx<'_>) -> Vec<DrawOp> {
    let p = &ctx.params;
    let (w, h) = (ctx.w(), ctx.h());
    let t = ctx.t_base * ctx.ctrl_speed() * 1.2;
    let freq = ctx.ctrl_freq() * 0.9;
    let step = map_range(p.smoothness, 1.0, 20.0, 18.0, 6.0);
    let base_amp = ctx.ctrl_amp() * 0.1;
    let seed = ctx.seed();

    let mut ops = Vec::new();
    for x in up_exclusive(-20.0, w + 20.0, step) {
        for y in up_exclusive(-20.0, h + 20.0, step) {
            let n = ctx.noise3(x * freq + seed, y * freq + seed * 0.71, t * 0.8);
            let drift_x = (n - 0.5) * base_amp * 0.6;
            let drift_y = ((x + y) * 0.004 + t * 20.0).sin() * base_amp * 0.08;
            ops.push(DrawOp::Circle {
                center: Point::new(x + drift_x, y + drift_y),
                diameter: step * (0.8 + n * 1.8),
                color: rgba(ctx.palette.for_noise(n), 35.0 + 220.0 * n.powf(1.2)),
            });
        }
    }
    ops
}

/// Circles masked to the ridges of the noise field.
pub(super) fn blob(ctx: &GenCtx<'_>) -> Vec<DrawOp> {
    let p = &ctx.params;
    let (w, h) = (ctx.w(), ctx.h());
    let t = ctx.t_base * ctx.ctrl_speed() * 0.8;
    let freq = ctx.ctrl_freq() * 0.7;
    let step = map_range(p.smoothness, 1.0, 20.0, 24.0, 10.0);
    let amp = ctx.ctrl_amp() * 0.08;
    let seed = ctx.seed();

    let mut ops = Vec::new();
    for x in up_exclusive(-40.0, w + 40.0, step) {
        for y in up_exclusive(-40.0, h + 40.0, step) {
            let n = ctx.noise3(x * freq + seed * 0.5, y * freq + seed * 0.8, t * 0.7);
            let ridged = (n - 0.5).abs() * 2.0;
            let mask = (1.0 - ridged).powf(2.4);
            if mask < 0.05 {
                continue;
            }
            let jitter_x = (n - 0.5) * amp;
            let jitter_y = ((x + y) * 0.01 + t * 12.0).sin() * amp * 0.4;
            let grain = ctx.noise2(x * 0.09 + y * 0.03 + seed, t * 3.0);
            ops.push(DrawOp::Circle {
                center: Point::new(x + jitter_x, y + jitter_y),
                diameter: step * (1.0 + 1.8 * mask),
                color: rgba(
                    ctx.palette.for_noise(n),
                    40.0 + 200.0 * mask * (0.7 + 0.3 * grain),
                ),
            });
        }
    }
    ops
}

/// Dot grid whose dot size follows the noise value.
pub(super) fn halftone(ctx: &GenCtx<'_>) -> Vec<DrawOp> {
    let p = &ctx.params;
    let (w, h) = (ctx.w(), ctx.h());
    let t = ctx.t_base * ctx.ctrl_speed() * 0.8;
    let step = map_range(p.smoothness, 1.0, 20.0, 40.0, 14.0).max(10.0);
    let freq = ctx.ctrl_freq() * 0.7;
    let seed = ctx.seed();

    let mut ops = Vec::new();
    for y in up_exclusive(0.0, h, step) {
        for x in up_exclusive(0.0, w, step) {
            let n = ctx.noise3(x * freq + seed, y * freq + seed * 0.33, t);
            let drift_x = ((x + t * 20.0) * 0.01).sin() * 4.0;
            let drift_y = ((y + t * 18.0) * 0.01).cos() * 4.0;
            ops.push(DrawOp::Circle {
                center: Point::new(x + drift_x, y + drift_y),
                diameter: map_range(n, 0.0, 1.0, step * 0.2, step * 0.95),
                color: rgba(ctx.palette.for_noise(n), 160.0),
            });
        }
    }
    ops
}
