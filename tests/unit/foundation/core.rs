use super::*;

#[test]
fn canvas_rejects_zero_and_oversized_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(400, 300).unwrap();
    assert_eq!(c.center(), Point::new(200.0, 150.0));
    assert_eq!(c.min_side(), 300.0);
    assert_eq!(c.max_side(), 400.0);
}

#[test]
fn canvas_contains_includes_edges() {
    let c = Canvas::new(100, 50).unwrap();
    assert!(c.contains(Point::new(0.0, 0.0)));
    assert!(c.contains(Point::new(100.0, 50.0)));
    assert!(!c.contains(Point::new(100.1, 10.0)));
    assert!(!c.contains(Point::new(-0.1, 10.0)));
}

#[test]
fn alpha_conversion_clamps_and_rejects_nan() {
    assert_eq!(alpha_u8(-20.0), 0);
    assert_eq!(alpha_u8(300.0), 255);
    assert_eq!(alpha_u8(127.6), 128);
    assert_eq!(alpha_u8(f64::NAN), 0);
}

#[test]
fn premul_from_straight_rounds() {
    let p = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(p.to_array(), [128, 64, 0, 128]);
    assert_eq!(
        Rgb8::WHITE.with_alpha(0.0).to_premul(),
        Rgba8Premul::transparent()
    );
}
