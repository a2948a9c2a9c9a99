use super::*;
use crate::foundation::core::{Canvas, Rgba8Premul};

fn layer(w: u32, h: u32) -> Layer {
    Layer::new(Canvas::new(w, h).unwrap()).unwrap()
}

#[test]
fn zoom_eases_toward_target() {
    let mut z = Zoom::default();
    z.toggle();
    assert_eq!(z.target, ZOOM_IN);
    z.step();
    assert!((z.factor - (1.0 + 0.12 * 0.08)).abs() < 1e-12);
    for _ in 0..400 {
        z.step();
    }
    assert!((z.factor - ZOOM_IN).abs() < 1e-6);
    z.toggle();
    assert_eq!(z.target, 1.0);
}

#[test]
fn later_layers_win() {
    let mut bottom = layer(2, 2);
    bottom.fill(Rgba8Premul::from_straight_rgba(255, 0, 0, 255));
    let mut top = layer(2, 2);
    top.data_mut()[..4].copy_from_slice(&[0, 0, 255, 255]);
    let mut dst = layer(2, 2);
    stack_layers(&mut dst, &[&bottom, &top]).unwrap();
    assert_eq!(dst.pixel(0, 0), [0, 0, 255, 255]);
    assert_eq!(dst.pixel(1, 1), [255, 0, 0, 255]);
}

#[test]
fn unit_zoom_presents_the_composite() {
    let mut composite = layer(8, 8);
    composite.fill(Rgba8Premul::from_straight_rgba(0, 255, 0, 255));
    let mut out = layer(8, 8);
    let frame = present(&composite, &mut out, 1.0, None).unwrap();
    assert_eq!(frame.pixel(4, 4), Some([0, 255, 0, 255]));
    assert!(frame.premultiplied);
}

#[test]
fn zoomed_out_leaves_transparent_border() {
    let mut composite = layer(20, 20);
    composite.fill(Rgba8Premul::from_straight_rgba(0, 255, 0, 255));
    let mut out = layer(20, 20);
    let frame = present(&composite, &mut out, 0.5, None).unwrap();
    assert_eq!(frame.pixel(0, 0).map(|p| p[3]), Some(0));
    assert_eq!(frame.pixel(10, 10), Some([0, 255, 0, 255]));
}
