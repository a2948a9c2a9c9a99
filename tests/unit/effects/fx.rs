use super::*;
use crate::foundation::core::Canvas;

fn layer(w: u32, h: u32) -> Layer {
    Layer::new(Canvas::new(w, h).unwrap()).unwrap()
}

fn noisy(w: u32, h: u32) -> Layer {
    let mut l = layer(w, h);
    for (i, px) in l.data_mut().chunks_exact_mut(4).enumerate() {
        let a = ((i * 37) % 256) as u8;
        let c = a / 2;
        px.copy_from_slice(&[c, c / 2, c / 3, a]);
    }
    l
}

#[test]
fn unit_settings_copy_exactly() {
    let src = noisy(9, 7);
    let mut dst = layer(9, 7);
    dst.fill(crate::foundation::core::Rgba8Premul::from_straight_rgba(1, 1, 1, 255));
    apply_layer_fx(&src, &mut dst, 1.0, 0.0).unwrap();
    assert_eq!(dst.data(), src.data());
}

#[test]
fn pixelation_uses_top_left_sample() {
    let mut src = layer(4, 4);
    src.data_mut()[..4].copy_from_slice(&[200, 100, 50, 255]);
    let mut dst = layer(4, 4);
    apply_layer_fx(&src, &mut dst, 2.0, 0.0).unwrap();
    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(dst.pixel(x, y), [200, 100, 50, 255]);
    }
    assert_eq!(dst.pixel(2, 2)[3], 0);
}

#[test]
fn transparent_samples_leave_copy_untouched() {
    let mut src = layer(4, 4);
    src.data_mut()[4..8].copy_from_slice(&[9, 9, 9, 255]);
    let mut dst = layer(4, 4);
    apply_layer_fx(&src, &mut dst, 4.0, 0.0).unwrap();
    assert_eq!(dst.data(), src.data());
}

#[test]
fn blur_passes_are_capped() {
    let src = noisy(6, 6);
    let mut capped = layer(6, 6);
    let mut fifty = layer(6, 6);
    apply_layer_fx(&src, &mut capped, 1.0, 500.0).unwrap();
    apply_layer_fx(&src, &mut fifty, 1.0, 50.0).unwrap();
    assert_eq!(capped.data(), fifty.data());
}

#[test]
fn size_mismatch_is_an_error() {
    let src = layer(4, 4);
    let mut dst = layer(5, 4);
    assert!(apply_layer_fx(&src, &mut dst, 1.0, 0.0).is_err());
}
