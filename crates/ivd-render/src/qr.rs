//! QR-code bitmaps: dark modules in the foreground color on a transparent
//! background, rendered to a square of exactly `size` pixels.

use crate::error::RenderError;
use crate::raster::encode_png_data_uri;
use image::{Rgba, RgbaImage};
use ivd_core::Color;
use qrcode::QrCode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QrStyle {
    pub foreground: Color,
    /// Output edge length in pixels.
    pub size: u32,
    /// Quiet zone in modules.
    pub margin: u32,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            foreground: Color::BLACK,
            size: 300,
            margin: 1,
        }
    }
}

/// An encoded bitmap ready to become an image source.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedBitmap {
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
}

/// Rasterize `payload` as a QR code.
pub fn render_qr(payload: &str, style: &QrStyle) -> Result<RgbaImage, RenderError> {
    if payload.trim().is_empty() {
        return Err(RenderError::QrPayload("payload is empty".into()));
    }
    let code =
        QrCode::new(payload.as_bytes()).map_err(|err| RenderError::QrPayload(err.to_string()))?;
    let modules = code.width() as u32;
    let dark = code.to_colors();
    let total = modules + 2 * style.margin;

    let size = if style.size < total {
        log::warn!(
            "QR size {} below module count {total}; rendering at {total}px",
            style.size
        );
        total
    } else {
        style.size
    };

    let ink = Rgba(style.foreground.to_rgba_array());
    let clear = Rgba([0, 0, 0, 0]);
    let module_at = |p: u32| -> Option<u32> {
        let m = (p as u64 * total as u64 / size as u64) as u32;
        (m >= style.margin && m < style.margin + modules).then(|| m - style.margin)
    };

    Ok(RgbaImage::from_fn(size, size, |x, y| {
        match (module_at(x), module_at(y)) {
            (Some(mx), Some(my))
                if dark[(my * modules + mx) as usize] == qrcode::Color::Dark =>
            {
                ink
            }
            _ => clear,
        }
    }))
}

/// Rasterize and encode as a PNG `data:` URI.
pub fn encode_qr(payload: &str, style: &QrStyle) -> Result<EncodedBitmap, RenderError> {
    let pixels = render_qr(payload, style)?;
    let data_uri = encode_png_data_uri(&pixels)?;
    Ok(EncodedBitmap {
        data_uri,
        width: pixels.width(),
        height: pixels.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::decode_data_uri;

    #[test]
    fn renders_exact_size_with_transparent_quiet_zone() {
        let style = QrStyle {
            foreground: Color::rgb(120, 20, 60),
            size: 290,
            margin: 2,
        };
        let img = render_qr("https://example.com/rsvp/ana-and-luis", &style).unwrap();
        assert_eq!(img.dimensions(), (290, 290));
        // Quiet zone.
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        // The top-left finder pattern starts right after the quiet zone.
        let module_px = 290 / (img_modules("https://example.com/rsvp/ana-and-luis") + 4);
        let inside = 2 * module_px + module_px / 2 + 1;
        assert_eq!(img.get_pixel(inside, inside), &Rgba([120, 20, 60, 255]));
    }

    fn img_modules(payload: &str) -> u32 {
        QrCode::new(payload.as_bytes()).unwrap().width() as u32
    }

    #[test]
    fn only_two_colors_are_used() {
        let style = QrStyle::default();
        let img = render_qr("hello", &style).unwrap();
        assert!(img.pixels().all(|p| *p == Rgba([0, 0, 0, 255]) || p[3] == 0));
    }

    #[test]
    fn tiny_size_grows_to_module_count() {
        let style = QrStyle {
            size: 4,
            ..Default::default()
        };
        let img = render_qr("hello", &style).unwrap();
        assert_eq!(img.width(), img_modules("hello") + 2);
    }

    #[test]
    fn empty_and_oversized_payloads_fail() {
        let style = QrStyle::default();
        assert!(matches!(render_qr("  ", &style), Err(RenderError::QrPayload(_))));
        let huge = "x".repeat(8000);
        assert!(matches!(render_qr(&huge, &style), Err(RenderError::QrPayload(_))));
    }

    #[test]
    fn encoded_bitmap_decodes() {
        let bitmap = encode_qr("hello", &QrStyle::default()).unwrap();
        let pixels = decode_data_uri(&bitmap.data_uri).unwrap();
        assert_eq!(pixels.dimensions(), (bitmap.width, bitmap.height));
    }
}
