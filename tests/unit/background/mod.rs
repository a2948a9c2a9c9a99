use super::*;
use crate::foundation::core::Point;
use crate::params::palette::parse_hex;
use crate::render::display_list::DrawOp;

fn canvas() -> Canvas {
    Canvas::new(400, 300).unwrap()
}

fn palettes() -> Vec<Palette> {
    vec![
        Palette::new(["#1e0326"]).unwrap(),
        Palette::new(["#1e0326", "#f18f96"]).unwrap(),
        Palette::default(),
    ]
}

fn path_points(op: &DrawOp) -> Vec<Point> {
    match op {
        DrawOp::StrokePath { path, .. } | DrawOp::FillPath { path, .. } => path
            .elements()
            .iter()
            .filter_map(|el| match el {
                kurbo::PathEl::MoveTo(p) | kurbo::PathEl::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[test]
fn calm_line_count_and_span() {
    let palette = Palette::new(["#1e0326"]).unwrap();
    let params = VisualParams {
        waves_amount: 175.0,
        ..Preset::Calm.profile()
    };
    let noise = NoiseField::new(1);
    let list = render(canvas(), Preset::Calm, &params, &palette, &noise, 12.0);

    // int(map(175, 20, 300, 40, 140)) = int(95.36)
    assert_eq!(list.len(), 95);
    assert_eq!(list.base, None);
    assert_eq!(list.transform, Affine::IDENTITY);
    for op in &list.ops {
        let DrawOp::StrokePath { color, .. } = op else {
            panic!("calm emits open strokes only");
        };
        assert_eq!(color.a, 255);
        let pts = path_points(op);
        assert_eq!(pts.first().map(|p| p.x), Some(-200.0));
        let last = pts.last().map(|p| p.x).unwrap();
        assert_eq!(last, 600.0);
        assert!(pts.windows(2).all(|w| w[1].x > w[0].x));
    }
}

#[test]
fn every_preset_tolerates_short_palettes() {
    let noise = NoiseField::new(3135);
    for palette in palettes() {
        let colors = palette.rgb();
        for preset in Preset::ALL {
            let params = preset.profile();
            let list = render(canvas(), preset, &params, &palette, &noise, 321.0);
            assert!(!list.is_empty(), "{preset} emitted nothing");
            for op in &list.ops {
                let c = op.color();
                let rgb = crate::foundation::core::Rgb8 {
                    r: c.r,
                    g: c.g,
                    b: c.b,
                };
                assert!(colors.contains(&rgb), "{preset} used a colour outside the palette");
            }
            assert!(list.points().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        }
    }
}

#[test]
fn negative_smoothness_is_clamped() {
    let noise = NoiseField::new(5);
    let palette = Palette::default();
    for preset in Preset::ALL {
        let params = VisualParams {
            smoothness: -5.0,
            waves_amount: f64::NAN,
            ..preset.profile()
        };
        let list = render(canvas(), preset, &params, &palette, &noise, 10.0);
        assert!(list.points().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        assert!(list.len() < 100_000);
    }
}

#[test]
fn non_calm_presets_use_the_global_transform() {
    let noise = NoiseField::new(5);
    let palette = Palette::default();
    let params = VisualParams {
        offset_x: 10.0,
        ..Preset::Burst.profile()
    };
    let list = render(canvas(), Preset::Burst, &params, &palette, &noise, 0.0);
    assert_eq!(list.base, Some(parse_hex("#1e0326")));
    let centre = list.transform * Point::new(200.0, 150.0);
    assert!((centre.x - 210.0).abs() < 1e-9);
    assert!((centre.y - 150.0).abs() < 1e-9);
}

#[test]
fn rendering_is_deterministic_and_continuous_in_time() {
    let noise = NoiseField::new(77);
    let palette = Palette::default();
    let params = Preset::Ribbons.profile();
    let a = render(canvas(), Preset::Ribbons, &params, &palette, &noise, 100.0);
    let b = render(canvas(), Preset::Ribbons, &params, &palette, &noise, 100.0);
    assert_eq!(a, b);

    let c = render(canvas(), Preset::Ribbons, &params, &palette, &noise, 100.001);
    let (pa, pc) = (path_points(&a.ops[0]), path_points(&c.ops[0]));
    assert_eq!(pa.len(), pc.len());
    let max_dy = pa
        .iter()
        .zip(&pc)
        .map(|(p, q)| (p.y - q.y).abs())
        .fold(0.0, f64::max);
    assert!(max_dy < 1.0, "{max_dy}");
}

#[test]
fn degenerate_band_counts_do_not_divide_by_zero() {
    let noise = NoiseField::new(1);
    let palette = Palette::default();
    let params = VisualParams {
        waves_amount: 20.0,
        ..Preset::Ribbons.profile()
    };
    let list = render(canvas(), Preset::Ribbons, &params, &palette, &noise, 0.0);
    assert_eq!(list.len(), 5);
    assert!(list.ops.iter().all(|op| op.color().a >= 130));
}

#[test]
fn solid_background_is_a_plain_fill() {
    let list = solid(crate::foundation::core::Rgb8 { r: 1, g: 2, b: 3 });
    assert!(list.is_empty());
    assert_eq!(list.base, Some(crate::foundation::core::Rgb8 { r: 1, g: 2, b: 3 }));
}

#[test]
fn painted_preset_covers_the_layer() {
    let noise = NoiseField::new(9);
    let palette = Palette::default();
    let list = render(
        Canvas::new(64, 48).unwrap(),
        Preset::Pixels,
        &Preset::Pixels.profile(),
        &palette,
        &noise,
        5.0,
    );
    let mut layer = crate::render::layer::Layer::new(Canvas::new(64, 48).unwrap()).unwrap();
    crate::render::painter::render_display_list(&list, &mut layer);
    assert!(layer.data().chunks_exact(4).all(|px| px[3] == 255));
}
