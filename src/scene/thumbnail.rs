use std::io::Cursor;
use std::path::Path;

use anyhow::Context;
use base64::Engine as _;

use crate::assets::image::SourceImage;
use crate::foundation::error::{DreamError, DreamResult};
use crate::render::frame::Frame;
use crate::scene::state::Answers;

/// Thumbnail width.
pub const THUMB_WIDTH: u32 = 420;
/// Thumbnail height.
pub const THUMB_HEIGHT: u32 = 280;
/// Thumbnail JPEG quality.
pub const THUMB_JPEG_QUALITY: u8 = 85;

const JPEG_PREFIX: &str = "data:image/jpeg;base64,";

/// Downscale `frame` to the archive card size and encode it as a JPEG data URI.
///
/// Returns `None` (with a warning) for a zero-size frame.
pub fn thumbnail_data_uri(frame: &Frame) -> DreamResult<Option<String>> {
    if frame.width == 0 || frame.height == 0 {
        tracing::warn!("canvas has zero size, skipping thumbnail");
        return Ok(None);
    }
    let rgb = frame.to_rgb_image()?;
    let small = image::imageops::resize(
        &rgb,
        THUMB_WIDTH,
        THUMB_HEIGHT,
        image::imageops::FilterType::Triangle,
    );
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, THUMB_JPEG_QUALITY)
        .encode_image(&small)
        .context("encode thumbnail jpeg")?;
    let payload = base64::engine::general_purpose::STANDARD.encode(&jpeg);
    Ok(Some(format!("{JPEG_PREFIX}{payload}")))
}

/// Decode a `data:<mime>;base64,<payload>` URI into an image.
pub fn decode_data_uri(uri: &str) -> DreamResult<SourceImage> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| DreamError::asset("not a data URI"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| DreamError::asset("data URI has no payload"))?;
    if !meta.ends_with(";base64") {
        return Err(DreamError::asset("data URI is not base64-encoded"));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .context("decode data URI payload")?;
    Ok(SourceImage::decode(&bytes)?.with_label(Some("thumbnail".to_owned())))
}

/// `visual-<preset>[_time-<t>]_f<frame>`, or `dream_f<frame>` without tags.
pub fn export_file_name(answers: &Answers, frame: u64) -> String {
    let mut tags = Vec::new();
    if let Some(visual) = answers.visual.as_deref().filter(|v| !v.is_empty()) {
        tags.push(format!("visual-{}", visual.to_lowercase()));
    }
    if let Some(time) = answers.time.as_deref().filter(|t| !t.is_empty()) {
        tags.push(format!("time-{time}"));
    }
    let base = if tags.is_empty() {
        "dream".to_owned()
    } else {
        tags.join("_")
    };
    format!("{base}_f{frame}")
}

/// Write `frame` as a straight-alpha PNG, creating parent directories.
pub fn write_png(frame: &Frame, path: &Path) -> DreamResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// PNG bytes of `frame`, for callers that do not write to disk.
pub fn encode_png(frame: &Frame) -> DreamResult<Vec<u8>> {
    let img = frame.to_rgba_image()?;
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/thumbnail.rs"]
mod tests;
