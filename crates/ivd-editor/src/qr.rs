//! QR-code objects.
//!
//! A QR code is an image whose bitmap carries the payload and color it was
//! generated from. Regenerating swaps the whole bitmap (source, pixel
//! size, metadata) through the single `Bitmap` property, so undo always
//! restores pixels and metadata together.

use crate::editor::Editor;
use crate::error::{EditorError, Notice};
use ivd_core::{
    Bitmap, Color, ObjectId, PropKey, PropValue, PropertySnapshot, QrMetadata, SceneAdapter,
    SceneObject,
};
use ivd_render::{QrStyle, encode_qr};

/// Properties that change when a QR code is regenerated.
const QR_KEYS: &[PropKey] = &[
    PropKey::Bitmap,
    PropKey::Width,
    PropKey::Height,
    PropKey::ScaleX,
    PropKey::ScaleY,
];

impl<S: SceneAdapter> Editor<S> {
    fn qr_bitmap(&mut self, payload: &str, color: Color) -> Result<Bitmap, EditorError> {
        let style = QrStyle {
            foreground: color,
            size: self.config.qr.size,
            margin: self.config.qr.margin,
        };
        match encode_qr(payload, &style) {
            Ok(encoded) => Ok(Bitmap {
                src: encoded.data_uri,
                pixel_width: encoded.width,
                pixel_height: encoded.height,
                qr: Some(QrMetadata {
                    payload: payload.to_string(),
                    color,
                }),
            }),
            Err(err) => {
                self.notify(Notice::warning(format!("Could not generate QR code: {err}")));
                Err(err.into())
            }
        }
    }

    /// The values that swap `bitmap` into `object` at the same rendered
    /// size.
    fn qr_values(object: &SceneObject, bitmap: Bitmap) -> PropertySnapshot {
        let (rendered_w, rendered_h) = object.geometry.scaled_size();
        let (pw, ph) = (bitmap.pixel_width as f64, bitmap.pixel_height as f64);
        [
            (PropKey::ScaleX, PropValue::Number(rendered_w / pw)),
            (PropKey::ScaleY, PropValue::Number(rendered_h / ph)),
            (PropKey::Width, PropValue::Number(pw)),
            (PropKey::Height, PropValue::Number(ph)),
            (PropKey::Bitmap, PropValue::Bitmap(Box::new(bitmap))),
        ]
        .into_iter()
        .collect()
    }

    fn require_qr(&self) -> Result<ObjectId, EditorError> {
        let object = self.active_object().ok_or(EditorError::NoActiveObject)?;
        match object.qr() {
            Some(_) => Ok(object.id),
            None => Err(EditorError::NotAQrCode(object.id)),
        }
    }

    /// Generate a QR code and add it centered on the canvas.
    pub fn add_qr_code(&mut self, payload: &str, color: Color) -> Result<ObjectId, EditorError> {
        self.ensure_not_cropping()?;
        let bitmap = self.qr_bitmap(payload, color)?;
        let (cx, cy) = self.scene.canvas().center();
        let left = cx - bitmap.pixel_width as f64 / 2.0;
        let top = cy - bitmap.pixel_height as f64 / 2.0;
        let mut object = SceneObject::image(bitmap, left, top);
        object.id = ObjectId::with_prefix("qrcode");
        Ok(self.add_object(object))
    }

    /// Regenerate the active QR code as one undo step. Returns false when
    /// payload and color are unchanged.
    pub fn update_qr_code(&mut self, payload: &str, color: Color) -> Result<bool, EditorError> {
        self.ensure_not_cropping()?;
        self.commit_interactive();
        let id = self.require_qr()?;
        if let Some(meta) = self.scene.object(id).and_then(|o| o.qr())
            && meta.payload == payload
            && meta.color == color
        {
            return Ok(false);
        }
        let bitmap = self.qr_bitmap(payload, color)?;
        let Some(object) = self.scene.object(id) else {
            return Err(EditorError::NoActiveObject);
        };
        let values = Self::qr_values(object, bitmap);
        self.set_properties(values)
    }

    /// Live preview while a color picker is dragged. The first call opens
    /// an interactive session; [`commit_interactive`](Self::commit_interactive)
    /// records the net change.
    pub fn preview_qr_color(&mut self, color: Color) -> Result<(), EditorError> {
        self.ensure_not_cropping()?;
        let id = self.require_qr()?;
        if self.interactive.as_ref().is_none_or(|s| s.target != id) {
            self.begin_interactive(QR_KEYS)?;
        }
        let Some(payload) = self.scene.object(id).and_then(|o| o.qr()).map(|m| m.payload.clone()) else {
            return Err(EditorError::NotAQrCode(id));
        };
        let bitmap = self.qr_bitmap(&payload, color)?;
        let Some(object) = self.scene.object(id) else {
            return Err(EditorError::NoActiveObject);
        };
        for (key, value) in Self::qr_values(object, bitmap).iter().cloned().collect::<Vec<_>>() {
            self.interactive_change(key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Editor, EditorError};
    use ivd_core::{Color, SceneAdapter, SceneObject};
    use pretty_assertions::assert_eq;

    const URL: &str = "https://example.com/rsvp";

    #[test]
    fn add_carries_metadata() {
        let mut editor = Editor::default();
        let id = editor.add_qr_code(URL, Color::BLACK).unwrap();
        let object = editor.scene().object(id).unwrap();
        let qr = object.qr().unwrap();
        assert_eq!(qr.payload, URL);
        assert_eq!(object.bitmap().unwrap().pixel_width, 300);
        assert_eq!((object.geometry.left, object.geometry.top), (450.0, 250.0));
    }

    #[test]
    fn update_swaps_bitmap_and_metadata_atomically() {
        let mut editor = Editor::default();
        let id = editor.add_qr_code(URL, Color::BLACK).unwrap();
        let before = editor.scene().object(id).unwrap().clone();
        let maroon = Color::rgb(128, 0, 32);

        assert!(editor.update_qr_code("https://example.com/other", maroon).unwrap());
        let after = editor.scene().object(id).unwrap().clone();
        assert_eq!(after.qr().unwrap().color, maroon);
        assert_ne!(after.bitmap().unwrap().src, before.bitmap().unwrap().src);
        assert!(!editor.update_qr_code("https://example.com/other", maroon).unwrap());

        editor.undo();
        assert_eq!(editor.scene().object(id).unwrap(), &before);
        editor.redo();
        assert_eq!(editor.scene().object(id).unwrap(), &after);
    }

    #[test]
    fn color_preview_is_one_step() {
        let mut editor = Editor::default();
        let id = editor.add_qr_code(URL, Color::BLACK).unwrap();
        let depth = editor.history().undo_len();
        for shade in [40, 80, 120] {
            editor.preview_qr_color(Color::rgb(shade, 0, 0)).unwrap();
        }
        assert!(editor.commit_interactive());
        assert_eq!(editor.history().undo_len(), depth + 1);
        assert_eq!(editor.scene().object(id).unwrap().qr().unwrap().color, Color::rgb(120, 0, 0));
        editor.undo();
        assert_eq!(editor.scene().object(id).unwrap().qr().unwrap().color, Color::BLACK);
    }

    #[test]
    fn bad_payload_and_non_qr_targets() {
        let mut editor = Editor::default();
        assert!(editor.add_qr_code("   ", Color::BLACK).is_err());
        assert_eq!(editor.take_notices().len(), 1);

        editor.add_object(SceneObject::rect(0.0, 0.0, 5.0, 5.0));
        assert!(matches!(
            editor.update_qr_code(URL, Color::BLACK),
            Err(EditorError::NotAQrCode(_))
        ));
    }
}
