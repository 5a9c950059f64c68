//! Bitmap plumbing for image objects: `data:` URI decode/encode, the
//! canvas → source-pixel mapping used by cropping, and the offscreen crop
//! itself.

use crate::error::RenderError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};
use ivd_core::Rect;
use std::io::Cursor;

/// A rectangle in source-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Decode a `data:<mime>;base64,<payload>` URI into RGBA pixels.
///
/// Any other source (an `https://` URL on a foreign origin, a blob URL)
/// cannot be read back here and yields [`RenderError::Unreadable`].
pub fn decode_data_uri(src: &str) -> Result<RgbaImage, RenderError> {
    let bytes = data_uri_bytes(src)?;
    decode_bytes(&bytes)
}

/// Extract the raw bytes of a base64 `data:` URI.
pub fn data_uri_bytes(src: &str) -> Result<Vec<u8>, RenderError> {
    let rest = src
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Unreadable(truncate(src)))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::Decode("data URI without payload".into()))?;
    if !header.ends_with(";base64") {
        return Err(RenderError::Decode(format!(
            "unsupported data URI encoding: {header}"
        )));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|err| RenderError::Decode(err.to_string()))
}

pub fn decode_bytes(bytes: &[u8]) -> Result<RgbaImage, RenderError> {
    let image =
        image::load_from_memory(bytes).map_err(|err| RenderError::Decode(err.to_string()))?;
    Ok(image.to_rgba8())
}

/// Pixel dimensions of an encoded image.
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), RenderError> {
    let image =
        image::load_from_memory(bytes).map_err(|err| RenderError::Decode(err.to_string()))?;
    Ok((image.width(), image.height()))
}

/// MIME type guessed from the file signature.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

/// Encode pixels as a PNG `data:` URI.
pub fn encode_png_data_uri(pixels: &RgbaImage) -> Result<String, RenderError> {
    let mut buf = Vec::new();
    pixels
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|err| RenderError::Encode(err.to_string()))?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&buf)))
}

/// Map a canvas-space rectangle into the source pixels of an image whose
/// rendered bounding box starts at `origin` and is scaled by `scale`.
///
/// Edges are rounded to whole pixels and clamped to the bitmap. Returns
/// `None` when nothing of the bitmap remains.
pub fn canvas_to_source(
    area: Rect,
    origin: (f64, f64),
    scale: (f64, f64),
    pixel_size: (u32, u32),
) -> Option<PixelRect> {
    let (sx, sy) = scale;
    if sx <= 0.0 || sy <= 0.0 {
        return None;
    }
    let to_px = |v: f64, o: f64, s: f64, max: u32| ((v - o) / s).round().clamp(0.0, max as f64);
    let x0 = to_px(area.x0, origin.0, sx, pixel_size.0);
    let x1 = to_px(area.x1, origin.0, sx, pixel_size.0);
    let y0 = to_px(area.y0, origin.1, sy, pixel_size.1);
    let y1 = to_px(area.y1, origin.1, sy, pixel_size.1);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(PixelRect {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

/// Copy a sub-region of `source` into a new buffer of exactly that size.
pub fn crop_pixels(source: &RgbaImage, region: PixelRect) -> Result<RgbaImage, RenderError> {
    let fits = region.width > 0
        && region.height > 0
        && region.x.saturating_add(region.width) <= source.width()
        && region.y.saturating_add(region.height) <= source.height();
    if !fits {
        return Err(RenderError::EmptyRegion);
    }
    let view = image::imageops::crop_imm(source, region.x, region.y, region.width, region.height);
    Ok(view.to_image())
}

fn truncate(src: &str) -> String {
    const MAX: usize = 64;
    match src.char_indices().nth(MAX) {
        Some((i, _)) => format!("{}…", &src[..i]),
        None => src.to_string(),
    }
}
