use crate::foundation::error::{DreamError, DreamResult};
use crate::foundation::math::mul_div255_u8 as mul_div255;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels, with an extra global opacity in `[0, 1]`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// `dst = src over dst` for two equally sized premultiplied buffers.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> DreamResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(DreamError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Fill the axis-aligned pixel rect `[x0, x1) × [y0, y1)` of a `width`-wide buffer with
/// `color` composited over the existing pixels. The rect is clipped to the buffer.
pub fn fill_rect_over(
    dst: &mut [u8],
    width: u32,
    height: u32,
    (x0, y0, x1, y1): (u32, u32, u32, u32),
    color: PremulRgba8,
) {
    if color[3] == 0 {
        return;
    }
    let x1 = x1.min(width);
    let y1 = y1.min(height);
    for y in y0..y1 {
        let row = y as usize * width as usize;
        for x in x0..x1 {
            let idx = (row + x as usize) * 4;
            let Some(px) = dst.get_mut(idx..idx + 4) else {
                continue;
            };
            let out = over([px[0], px[1], px[2], px[3]], color, 1.0);
            px.copy_from_slice(&out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
