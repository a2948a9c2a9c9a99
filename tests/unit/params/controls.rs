use super::*;

#[test]
fn defaults() {
    assert_eq!(FragmentControls::default().amount, 1.0);
    assert_eq!(ImageControls::default().size, 1.0);
    assert_eq!(FxParams::default().frag_pixel, 1.0);
    assert_eq!(FxParams::default().helper_blur, 0.0);
    assert_eq!(PerfLimits::default().max_draw_particles, 260);
    assert_eq!(PerfLimits::default().max_fragments_base, 14);
}

#[test]
fn clamps() {
    let f = FragmentControls {
        amount: 9.0,
        speed: 0.0,
        size: f64::NAN,
    }
    .clamped();
    assert_eq!((f.amount, f.speed, f.size), (3.0, 0.4, 1.0));

    let fx = FxParams {
        frag_pixel: 0.0,
        frag_blur: 99.0,
        helper_pixel: 100.0,
        helper_blur: -1.0,
    }
    .clamped();
    assert_eq!(fx.frag_pixel, 1.0);
    assert_eq!(fx.frag_blur, 8.0);
    assert_eq!(fx.helper_pixel, 40.0);
    assert_eq!(fx.helper_blur, 0.0);
}

#[test]
fn persisted_shapes() {
    let vc: VisControls =
        serde_json::from_str(r#"{"fragments": {"amount": 2, "speed": 1.5}}"#).unwrap();
    assert_eq!(vc.fragments.amount, 2.0);
    assert_eq!(vc.fragments.size, 1.0);

    let fx = serde_json::to_value(FxParams::default()).unwrap();
    assert!(fx.get("fragPixel").is_some());
    assert!(fx.get("helperBlur").is_some());
}

#[test]
fn selection_wheel_clamps() {
    let mut s = SelectionSize::default();
    s.wheel(100.0);
    assert_eq!(s.get(), 110.0);
    s.wheel(10_000.0);
    assert_eq!(s.get(), SELECTION_MIN);
    s.wheel(-10_000.0);
    assert_eq!(s.get(), SELECTION_MAX);
}
