use crate::foundation::error::{DreamError, DreamResult};

/// One box-blur pass with the given radius over a premultiplied RGBA8 buffer.
///
/// Separable, edge-clamped, 16.16 fixed-point weights.
pub fn box_blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
) -> DreamResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| DreamError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(DreamError::render(
            "box_blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = box_kernel_q16(radius);
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    blur_axis(src, &mut tmp, width, height, &kernel, Axis::X);
    blur_axis(&tmp, &mut out, width, height, &kernel, Axis::Y);
    Ok(out)
}

/// Apply `passes` radius-1 box blurs in place.
pub fn blur_passes_in_place(
    data: &mut [u8],
    width: u32,
    height: u32,
    passes: u32,
) -> DreamResult<()> {
    for _ in 0..passes {
        let out = box_blur_rgba8_premul(data, width, height, 1)?;
        data.copy_from_slice(&out);
    }
    Ok(())
}

fn box_kernel_q16(radius: u32) -> Vec<u32> {
    let taps = 2 * radius as usize + 1;
    let base = 65536 / taps as u32;
    let mut weights = vec![base; taps];
    let rem = 65536 - base * taps as u32;
    weights[taps / 2] += rem;
    weights
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn blur_axis(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], axis: Axis) {
    let r = (k.len() / 2) as i64;
    let (w, h) = (i64::from(width), i64::from(height));
    for y in 0..h {
        for x in 0..w {
            let mut sum = [0u64; 4];
            for (tap, &weight) in (-r..=r).zip(k) {
                let (sx, sy) = match axis {
                    Axis::X => ((x + tap).clamp(0, w - 1), y),
                    Axis::Y => (x, (y + tap).clamp(0, h - 1)),
                };
                let px = &src[((sy * w + sx) * 4) as usize..][..4];
                for (acc, &v) in sum.iter_mut().zip(px) {
                    *acc += u64::from(weight) * u64::from(v);
                }
            }
            let out = &mut dst[((y * w + x) * 4) as usize..][..4];
            for (o, acc) in out.iter_mut().zip(sum) {
                *o = q16_to_u8(acc);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
