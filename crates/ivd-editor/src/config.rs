//! Editor configuration.
//!
//! Every field has a default, so a host may pass `{}` or any subset:
//!
//! ```json
//! { "canvas": { "width": 1080, "height": 1920 }, "snap_threshold": 8 }
//! ```

use ivd_core::{CanvasSize, Color};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas: CanvasSize,
    /// Snap distance in canvas units, inclusive.
    pub snap_threshold: f64,
    pub guide_color: Color,
    /// Undo depth limit; unlimited when absent.
    pub max_history: Option<usize>,
    pub qr: QrConfig,
    /// Offset applied to duplicated objects.
    pub duplicate_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            snap_threshold: 6.0,
            guide_color: Color::rgb(0xFF, 0x00, 0xFF),
            max_history: None,
            qr: QrConfig::default(),
            duplicate_offset: 10.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    /// Rendered edge length in pixels.
    pub size: u32,
    /// Quiet zone in modules.
    pub margin: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self { size: 300, margin: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = EditorConfig::from_json(
            r##"{ "canvas": { "width": 1080, "height": 1920 }, "guide_color": "#00ff00", "qr": { "size": 512 } }"##,
        )
        .unwrap();
        assert_eq!(cfg.canvas, CanvasSize { width: 1080.0, height: 1920.0 });
        assert_eq!(cfg.guide_color, Color::rgb(0, 255, 0));
        assert_eq!(cfg.qr, QrConfig { size: 512, margin: 1 });
        assert_eq!(cfg.snap_threshold, 6.0);
    }
}
