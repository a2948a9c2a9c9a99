use crate::effects::blur::blur_passes_in_place;
use crate::effects::composite::fill_rect_over;
use crate::foundation::error::DreamResult;
use crate::render::layer::Layer;

/// Upper bound on blur passes per frame.
pub const MAX_BLUR_PASSES: u32 = 50;

/// Post-effect stage for one particle layer.
///
/// `dst` becomes a copy of `src`; when `pixel_size > 1` every `pixel_size`-sided cell is painted
/// over with the colour of its top-left source pixel (fully transparent samples are skipped); then
/// `min(50, blur)` radius-1 box-blur passes run on `dst`. `(1, 0)` is an exact copy.
#[tracing::instrument(level = "trace", skip(src, dst))]
pub fn apply_layer_fx(src: &Layer, dst: &mut Layer, pixel_size: f64, blur: f64) -> DreamResult<()> {
    dst.copy_from(src)?;

    let step = if pixel_size.is_finite() {
        pixel_size.max(1.0).trunc() as u32
    } else {
        1
    };
    let passes = if blur.is_finite() {
        (blur.max(0.0).trunc() as u32).min(MAX_BLUR_PASSES)
    } else {
        0
    };

    let (w, h) = (u32::from(dst.width()), u32::from(dst.height()));
    if step > 1 {
        let data = dst.data_mut();
        let mut y = 0;
        while y < h {
            let mut x = 0;
            while x < w {
                let sample = src.pixel(x, y);
                if sample[3] != 0 {
                    fill_rect_over(data, w, h, (x, y, x + step, y + step), sample);
                }
                x += step;
            }
            y += step;
        }
    }

    if passes > 0 {
        blur_passes_in_place(dst.data_mut(), w, h, passes)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/fx.rs"]
mod tests;
