use crate::foundation::core::{Point, Rect};
use crate::foundation::math::{lerp, map_range, trunc_count};
use crate::render::display_list::{DrawOp, polyline};

use super::shared::{GenCtx, down_inclusive, rgba, up_inclusive};

fn last_index(n: usize) -> f64 {
    n.saturating_sub(1).max(1) as f64
}

/// Closed horizontal bands whose two edges follow independent noise rows.
pub(super) fn ribbons(ctx: &GenCtx<'_>) -> Vec<DrawOp> {
    let p = &ctx.params;
    let (w, h) = (ctx.w(), ctx.h());
    let t = ctx.t_base * ctx.ctrl_speed() * 1.4;
    let amp = ctx.ctrl_amp() * 0.35;
    let freq = ctx.ctrl_freq() * 1.2;
    let bands = trunc_count(map_range(p.waves_amount, 20.0, 300.0, 5.0, 10.0));
    let smooth = (p.smoothness * 1.2).max(3.0);
    let thickness = map_range(p.wave_width, 60.0, 400.0, 60.0, 260.0);
    let seed = ctx.seed();

    (0..bands)
        .map(|i| {
            let fi = i as f64;
            let base_y = map_range(fi, 0.0, bands as f64 - 1.0, h * 0.05, h * 0.95);
            let alpha = 130.0 + 90.0 * (fi / last_index(bands));
            let edge = |x: f64, z: f64| {
                let n = ctx.noise3(x * freq * 0.7 + seed, fi * 0.4, z);
                base_y + (n - 0.5) * 2.0 * amp
            };
            let top = up_inclusive(-w * 0.2, w * 1.2, smooth)
                .map(|x| Point::new(x, edge(x, t * 0.9) - thickness / 2.0));
            let bottom = down_inclusive(w * 1.2, -w * 0.2, smooth)
                .map(|x| Point::new(x, edge(x, t * 0.9 + 40.0) + thickness / 2.0));
            DrawOp::FillPath {
                path: polyline(top.chain(bottom), true),
                color: rgba(ctx.palette.cycle(i), alpha),
            }
        })
        .collect()
}

/// Full-height vertical bars with noise-driven width and shift.
pub(super) fn bars(ctx: &GenCtx<'_>) -> Vec<DrawOp> {
    let p = &ctx.params;
    let (w, h) = (ctx.w(), ctx.h());
    let t = ctx.t_base * ctx.ctrl_speed() * 2.5;
    let bands = trunc_count(map_range(p.waves_amount, 20.0, 300.0, 20.0, 80.0));
    let base_width = map_range(p.wave_width, 60.0, 400.0, 4.0, 40.0);

    (0..bands)
        .map(|i| {
            let u = i as f64 / last_index(bands);
            let x_center = lerp(-w * 0.1, w * 1.1, u);
            let n = ctx.noise2(u * 4.0 + ctx.seed() * 0.01, t);
            let width = base_width * (0.4 + 1.8 * n);
            let shift = (n - 0.5) * 80.0;
            let x0 = x_center + shift;
            DrawOp::Rect {
                rect: Rect::new(x0, 0.0, x0 + width, h * 1.2),
                radius: 0.0,
                color: rgba(ctx.palette.cycle(i), 80.0 + 160.0 * n),
            }
        })
        .collect()
}

/// Wide flowing bands that run past both canvas edges.
pub(super) fn flow(ctx: &GenCtx<'_>) -> Vec<DrawOp> {
    let p = &ctx.params;
    let (w, h) = (ctx.w(), ctx.h());
    let t = ctx.t_base * ctx.ctrl_speed() * 1.25;
    let amp = ctx.ctrl_amp() * 0.22;
    let freq = ctx.ctrl_freq() * 0.65;
    let rows = trunc_count(map_range(p.waves_amount, 20.0, 300.0, 6.0, 18.0));
    let smooth = (p.smoothness * 2.0).max(4.0);
    let thickness = map_range(p.wave_width, 60.0, 400.0, 90.0, 280.0);
    let seed = ctx.seed();

    (0..rows)
        .map(|r| {
            let fr = r as f64;
            let base_y = map_range(fr, 0.0, rows as f64 - 1.0, -h * 0.2, h * 1.2);
            let alpha = (80.0 + 100.0 * (t * 0.02 + fr * 0.45).sin()).max(0.0);

            let top = up_inclusive(-w, w * 2.0, smooth).map(|x| {
                let n1 = ctx.noise3(x * freq + seed * 0.35, fr * 0.5, t * 0.8);
                let n2 = ctx.noise3(x * freq * 0.5 - seed * 0.5, fr * 0.25 + 80.0, t * 0.6);
                let offset = (n1 - 0.5) * amp + (n2 - 0.5) * amp * 0.6;
                Point::new(x, base_y + offset - thickness / 2.0)
            });
            let bottom = down_inclusive(w * 2.0, -w, smooth).map(|x| {
                let n1 = ctx.noise3(x * freq + seed * 0.4, fr * 0.4 + 140.0, t * 1.1);
                let n2 = ctx.noise3(x * freq * 0.55 + 40.0, fr * 0.22 + 200.0, t * 0.7);
                let offset = (n1 - 0.5) * amp + (n2 - 0.5) * amp * 0.6;
                Point::new(x, base_y + offset + thickness / 2.0)
            });
            DrawOp::FillPath {
                path: polyline(top.chain(bottom), true),
                color: rgba(ctx.palette.cycle(r), alpha),
            }
        })
        .collect()
}
