//! Scene object model for invitation designs.
//!
//! A design page is a flat, z-ordered list of [`SceneObject`]s. Every
//! object shares geometry, paint and interaction flags; the per-kind
//! properties live in [`ObjectKind`]. Auxiliary objects (snap guides, the
//! crop region) carry `exclude_from_export` and never reach a saved page.

use crate::color::Color;
use crate::geometry::Geometry;
use crate::id::ObjectId;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

// ─── Paint ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paint {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: Some(Color::BLACK),
            stroke: None,
            stroke_width: 1.0,
        }
    }
}

// ─── Text ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextProps {
    pub content: String,
    pub font_family: String,
    pub font_size: f64,
    /// CSS numeric weight, 100..900.
    pub font_weight: u16,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
    /// Letter spacing in thousandths of an em.
    pub char_spacing: f64,
    pub line_height: f64,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_family: "Playfair Display".into(),
            font_size: 32.0,
            font_weight: 400,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Left,
            char_spacing: 0.0,
            line_height: 1.16,
        }
    }
}

// ─── Images & QR codes ───────────────────────────────────────────────────

/// Side data of a QR-code image: what it encodes and in which color.
/// Must always describe the bitmap it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrMetadata {
    pub payload: String,
    pub color: Color,
}

/// The rendered source of an image object. The source URI, its pixel
/// dimensions and the optional QR metadata always change together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bitmap {
    /// URL or `data:` URI of the source image.
    pub src: String,
    pub pixel_width: u32,
    pub pixel_height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr: Option<QrMetadata>,
}

impl Bitmap {
    pub fn new(src: impl Into<String>, pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            src: src.into(),
            pixel_width,
            pixel_height,
            qr: None,
        }
    }

    pub fn is_qr(&self) -> bool {
        self.qr.is_some()
    }
}

// ─── Object kinds ────────────────────────────────────────────────────────

/// Kind-specific properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    Text(TextProps),
    Rect {
        #[serde(default)]
        corner_radius: f64,
    },
    Circle,
    Image(Bitmap),
    /// A straight line from the object's origin across its width/height.
    Line,
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Text(_) => "text",
            ObjectKind::Rect { .. } => "rect",
            ObjectKind::Circle => "circle",
            ObjectKind::Image(_) => "image",
            ObjectKind::Line => "line",
        }
    }
}

// ─── Scene objects ───────────────────────────────────────────────────────

fn yes() -> bool {
    true
}

/// A drawable entity owned by the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    #[serde(flatten)]
    pub kind: ObjectKind,
    #[serde(default)]
    pub geometry: Geometry,
    #[serde(default)]
    pub paint: Paint,
    #[serde(default = "yes")]
    pub selectable: bool,
    #[serde(default = "yes")]
    pub evented: bool,
    #[serde(default = "yes")]
    pub visible: bool,
    /// Locks movement, scaling and rotation.
    #[serde(default)]
    pub locked: bool,
    /// Auxiliary object that is never serialized into a page.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclude_from_export: bool,
}

impl SceneObject {
    pub fn new(id: ObjectId, kind: ObjectKind, geometry: Geometry) -> Self {
        Self {
            id,
            kind,
            geometry,
            paint: Paint::default(),
            selectable: true,
            evented: true,
            visible: true,
            locked: false,
            exclude_from_export: false,
        }
    }

    pub fn text(content: &str, left: f64, top: f64, width: f64, height: f64) -> Self {
        let props = TextProps {
            content: content.to_string(),
            ..Default::default()
        };
        Self::new(
            ObjectId::with_prefix("text"),
            ObjectKind::Text(props),
            Geometry::new(left, top, width, height),
        )
    }

    pub fn rect(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(
            ObjectId::with_prefix("rect"),
            ObjectKind::Rect { corner_radius: 0.0 },
            Geometry::new(left, top, width, height),
        )
    }

    pub fn circle(left: f64, top: f64, radius: f64) -> Self {
        Self::new(
            ObjectId::with_prefix("circle"),
            ObjectKind::Circle,
            Geometry::new(left, top, radius * 2.0, radius * 2.0),
        )
    }

    /// An image displayed at its natural pixel size.
    pub fn image(bitmap: Bitmap, left: f64, top: f64) -> Self {
        let geometry = Geometry::new(
            left,
            top,
            bitmap.pixel_width as f64,
            bitmap.pixel_height as f64,
        );
        let mut obj = Self::new(
            ObjectId::with_prefix("image"),
            ObjectKind::Image(bitmap),
            geometry,
        );
        obj.paint.fill = None;
        obj
    }

    pub fn bounding_box(&self) -> Rect {
        self.geometry.bounding_box()
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        match &self.kind {
            ObjectKind::Image(bitmap) => Some(bitmap),
            _ => None,
        }
    }

    pub fn text_props(&self) -> Option<&TextProps> {
        match &self.kind {
            ObjectKind::Text(props) => Some(props),
            _ => None,
        }
    }

    pub fn qr(&self) -> Option<&QrMetadata> {
        self.bitmap().and_then(|b| b.qr.as_ref())
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ObjectKind::Image(_))
    }

    /// A copy with a fresh id.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = ObjectId::with_prefix(self.kind.name());
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serde_roundtrip_keeps_kind_props() {
        let mut text = SceneObject::text("Save the date", 10.0, 20.0, 300.0, 40.0);
        if let ObjectKind::Text(props) = &mut text.kind {
            props.font_weight = 700;
            props.text_align = TextAlign::Center;
        }
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["font_weight"], 700);
        let back: SceneObject = serde_json::from_value(json).unwrap();
        assert_eq!(back, text);
    }

    #[test]
    fn qr_metadata_rides_on_the_bitmap() {
        let mut bitmap = Bitmap::new("data:image/png;base64,AAAA", 300, 300);
        bitmap.qr = Some(QrMetadata {
            payload: "https://example.com/rsvp".into(),
            color: Color::rgb(20, 40, 60),
        });
        let obj = SceneObject::image(bitmap, 0.0, 0.0);
        assert!(obj.is_image());
        assert_eq!(obj.qr().map(|q| q.payload.as_str()), Some("https://example.com/rsvp"));

        let json = serde_json::to_value(&obj).unwrap();
        let back: SceneObject = serde_json::from_value(json).unwrap();
        assert_eq!(back.qr(), obj.qr());
    }

    #[test]
    fn missing_flags_default_to_interactive() {
        let json = serde_json::json!({
            "id": "r1",
            "type": "rect",
            "geometry": { "left": 1.0, "top": 2.0, "width": 3.0, "height": 4.0 }
        });
        let obj: SceneObject = serde_json::from_value(json).unwrap();
        assert!(obj.selectable && obj.evented && obj.visible);
        assert!(!obj.locked && !obj.exclude_from_export);
        assert_eq!(obj.geometry.scale_x, 1.0);
        assert_eq!(obj.kind, ObjectKind::Rect { corner_radius: 0.0 });
    }

    #[test]
    fn duplicate_gets_fresh_id() {
        let r = SceneObject::rect(0.0, 0.0, 10.0, 10.0);
        let d = r.duplicate();
        assert_ne!(r.id, d.id);
        assert_eq!(r.geometry, d.geometry);
    }
}
