//! Restricted property snapshots.
//!
//! A [`PropertySnapshot`] captures only the named properties of one object.
//! Update commands store a before/after pair of snapshots, so applying
//! one never clobbers properties outside the captured set.

use crate::color::Color;
use crate::model::{Bitmap, FontStyle, ObjectKind, SceneObject, TextAlign};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// An editable property of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropKey {
    Left,
    Top,
    Width,
    Height,
    ScaleX,
    ScaleY,
    Angle,
    SkewX,
    SkewY,
    Fill,
    Stroke,
    StrokeWidth,
    Locked,
    Text,
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    TextAlign,
    CharSpacing,
    LineHeight,
    CornerRadius,
    /// Image source together with its QR metadata.
    Bitmap,
}

impl PropKey {
    pub const GEOMETRY: &'static [PropKey] = &[
        PropKey::Left,
        PropKey::Top,
        PropKey::Width,
        PropKey::Height,
        PropKey::ScaleX,
        PropKey::ScaleY,
        PropKey::Angle,
        PropKey::SkewX,
        PropKey::SkewY,
    ];

    /// Everything a canvas gesture (drag, resize, rotate) or a panel
    /// control can touch. Captured on pointer-down.
    pub const TRACKED: &'static [PropKey] = &[
        PropKey::Left,
        PropKey::Top,
        PropKey::Width,
        PropKey::Height,
        PropKey::ScaleX,
        PropKey::ScaleY,
        PropKey::Angle,
        PropKey::SkewX,
        PropKey::SkewY,
        PropKey::Fill,
        PropKey::Stroke,
        PropKey::StrokeWidth,
        PropKey::Locked,
        PropKey::Text,
        PropKey::FontFamily,
        PropKey::FontSize,
        PropKey::FontWeight,
        PropKey::FontStyle,
        PropKey::TextAlign,
        PropKey::CharSpacing,
        PropKey::LineHeight,
        PropKey::CornerRadius,
    ];
}

/// A property value. Which variant goes with which key is fixed by
/// [`SceneObject::get_prop`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Number(f64),
    Bool(bool),
    Color(Option<Color>),
    Text(String),
    Weight(u16),
    FontStyle(FontStyle),
    Align(TextAlign),
    Bitmap(Box<Bitmap>),
}

/// Ordered key → value pairs for one object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySnapshot {
    entries: SmallVec<[(PropKey, PropValue); 8]>,
}

impl PropertySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture `keys` from `obj`, skipping keys the object's kind lacks.
    pub fn capture(obj: &SceneObject, keys: &[PropKey]) -> Self {
        let mut snap = Self::new();
        for &key in keys {
            if let Some(value) = obj.get_prop(key) {
                snap.set(key, value);
            }
        }
        snap
    }

    pub fn set(&mut self, key: PropKey, value: PropValue) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: PropKey) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = PropKey> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(PropKey, PropValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restrict two snapshots to the keys whose values differ.
    /// Returns `None` when nothing changed.
    pub fn diff(before: &Self, after: &Self) -> Option<(Self, Self)> {
        let mut b = Self::new();
        let mut a = Self::new();
        for (key, after_value) in after.iter() {
            match before.get(*key) {
                Some(before_value) if before_value == after_value => {}
                Some(before_value) => {
                    b.set(*key, before_value.clone());
                    a.set(*key, after_value.clone());
                }
                None => {}
            }
        }
        if a.is_empty() { None } else { Some((b, a)) }
    }
}

impl FromIterator<(PropKey, PropValue)> for PropertySnapshot {
    fn from_iter<T: IntoIterator<Item = (PropKey, PropValue)>>(iter: T) -> Self {
        let mut snap = Self::new();
        for (k, v) in iter {
            snap.set(k, v);
        }
        snap
    }
}

impl SceneObject {
    /// Read one property. `None` when this kind has no such property.
    pub fn get_prop(&self, key: PropKey) -> Option<PropValue> {
        let g = &self.geometry;
        let value = match key {
            PropKey::Left => PropValue::Number(g.left),
            PropKey::Top => PropValue::Number(g.top),
            PropKey::Width => PropValue::Number(g.width),
            PropKey::Height => PropValue::Number(g.height),
            PropKey::ScaleX => PropValue::Number(g.scale_x),
            PropKey::ScaleY => PropValue::Number(g.scale_y),
            PropKey::Angle => PropValue::Number(g.angle),
            PropKey::SkewX => PropValue::Number(g.skew_x),
            PropKey::SkewY => PropValue::Number(g.skew_y),
            PropKey::Fill => PropValue::Color(self.paint.fill),
            PropKey::Stroke => PropValue::Color(self.paint.stroke),
            PropKey::StrokeWidth => PropValue::Number(self.paint.stroke_width),
            PropKey::Locked => PropValue::Bool(self.locked),
            PropKey::CornerRadius => match &self.kind {
                ObjectKind::Rect { corner_radius } => PropValue::Number(*corner_radius),
                _ => return None,
            },
            PropKey::Bitmap => PropValue::Bitmap(Box::new(self.bitmap()?.clone())),
            text_key => {
                let t = self.text_props()?;
                match text_key {
                    PropKey::Text => PropValue::Text(t.content.clone()),
                    PropKey::FontFamily => PropValue::Text(t.font_family.clone()),
                    PropKey::FontSize => PropValue::Number(t.font_size),
                    PropKey::FontWeight => PropValue::Weight(t.font_weight),
                    PropKey::FontStyle => PropValue::FontStyle(t.font_style),
                    PropKey::TextAlign => PropValue::Align(t.text_align),
                    PropKey::CharSpacing => PropValue::Number(t.char_spacing),
                    PropKey::LineHeight => PropValue::Number(t.line_height),
                    _ => return None,
                }
            }
        };
        Some(value)
    }

    /// Write one property. Returns false when the key does not apply to
    /// this kind or the value has the wrong shape.
    pub fn set_prop(&mut self, key: PropKey, value: PropValue) -> bool {
        let g = &mut self.geometry;
        match (key, value) {
            (PropKey::Left, PropValue::Number(v)) => g.left = v,
            (PropKey::Top, PropValue::Number(v)) => g.top = v,
            (PropKey::Width, PropValue::Number(v)) => g.width = v,
            (PropKey::Height, PropValue::Number(v)) => g.height = v,
            (PropKey::ScaleX, PropValue::Number(v)) => g.scale_x = v,
            (PropKey::ScaleY, PropValue::Number(v)) => g.scale_y = v,
            (PropKey::Angle, PropValue::Number(v)) => g.angle = v,
            (PropKey::SkewX, PropValue::Number(v)) => g.skew_x = v,
            (PropKey::SkewY, PropValue::Number(v)) => g.skew_y = v,
            (PropKey::Fill, PropValue::Color(c)) => self.paint.fill = c,
            (PropKey::Stroke, PropValue::Color(c)) => self.paint.stroke = c,
            (PropKey::StrokeWidth, PropValue::Number(v)) => self.paint.stroke_width = v,
            (PropKey::Locked, PropValue::Bool(v)) => self.locked = v,
            (PropKey::CornerRadius, PropValue::Number(v)) => match &mut self.kind {
                ObjectKind::Rect { corner_radius } => *corner_radius = v,
                _ => return false,
            },
            (PropKey::Bitmap, PropValue::Bitmap(b)) => match &mut self.kind {
                ObjectKind::Image(bitmap) => *bitmap = *b,
                _ => return false,
            },
            (key, value) => {
                let ObjectKind::Text(t) = &mut self.kind else {
                    return false;
                };
                match (key, value) {
                    (PropKey::Text, PropValue::Text(s)) => t.content = s,
                    (PropKey::FontFamily, PropValue::Text(s)) => t.font_family = s,
                    (PropKey::FontSize, PropValue::Number(v)) => t.font_size = v,
                    (PropKey::FontWeight, PropValue::Weight(w)) => t.font_weight = w,
                    (PropKey::FontStyle, PropValue::FontStyle(s)) => t.font_style = s,
                    (PropKey::TextAlign, PropValue::Align(a)) => t.text_align = a,
                    (PropKey::CharSpacing, PropValue::Number(v)) => t.char_spacing = v,
                    (PropKey::LineHeight, PropValue::Number(v)) => t.line_height = v,
                    _ => return false,
                }
            }
        }
        true
    }

    /// Apply every entry of a snapshot.
    pub fn apply(&mut self, snapshot: &PropertySnapshot) {
        for (key, value) in snapshot.iter() {
            if !self.set_prop(*key, value.clone()) {
                log::warn!("{}: cannot apply {key:?} = {value:?}", self.id);
            }
        }
    }
}
