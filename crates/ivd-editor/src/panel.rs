//! Read model for the property panel.

use crate::editor::Editor;
use ivd_core::{Color, FontStyle, ObjectId, QrMetadata, SceneAdapter, TextAlign};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u16,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
    pub char_spacing: f64,
    pub line_height: f64,
}

/// What the panel shows for the active object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelState {
    pub id: ObjectId,
    pub kind: &'static str,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub angle: f64,
    pub locked: bool,
    pub text: Option<TextStyle>,
    pub corner_radius: Option<f64>,
    pub qr: Option<QrMetadata>,
    pub is_at_front: bool,
    pub is_at_back: bool,
    pub cropping: bool,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl<S: SceneAdapter> Editor<S> {
    pub fn panel_state(&self) -> Option<PanelState> {
        let object = self.active_object()?;
        let content: Vec<ObjectId> = self
            .scene
            .objects()
            .iter()
            .filter(|o| !o.exclude_from_export)
            .map(|o| o.id)
            .collect();
        let text = object.text_props().map(|t| TextStyle {
            font_family: t.font_family.clone(),
            font_size: t.font_size,
            font_weight: t.font_weight,
            font_style: t.font_style,
            text_align: t.text_align,
            char_spacing: t.char_spacing,
            line_height: t.line_height,
        });
        let corner_radius = match object.kind {
            ivd_core::ObjectKind::Rect { corner_radius } => Some(corner_radius),
            _ => None,
        };
        Some(PanelState {
            id: object.id,
            kind: object.kind.name(),
            fill: object.paint.fill,
            stroke: object.paint.stroke,
            stroke_width: object.paint.stroke_width,
            angle: object.geometry.angle,
            locked: object.locked,
            text,
            corner_radius,
            qr: object.qr().cloned(),
            is_at_front: content.last() == Some(&object.id),
            is_at_back: content.first() == Some(&object.id),
            cropping: self.is_cropping(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Editor;
    use ivd_core::{SceneAdapter, SceneObject, TextAlign};
    use pretty_assertions::assert_eq;

    #[test]
    fn reflects_active_text() {
        let mut editor = Editor::default();
        assert!(editor.panel_state().is_none());
        let rect = editor.add_object(SceneObject::rect(0.0, 0.0, 10.0, 10.0));
        let text = editor.add_object(SceneObject::text("Hi", 0.0, 0.0, 10.0, 10.0));

        let state = editor.panel_state().unwrap();
        assert_eq!(state.kind, "text");
        assert_eq!(state.text.unwrap().text_align, TextAlign::Left);
        assert!(state.is_at_front && !state.is_at_back);
        assert!(state.can_undo);

        editor.scene_mut().set_active(Some(rect));
        let state = editor.panel_state().unwrap();
        assert_eq!(state.corner_radius, Some(0.0));
        assert!(state.is_at_back);
        assert_ne!(state.id, text);
    }
}
