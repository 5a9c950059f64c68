//! The scene adapter: the mutable, z-ordered object collection the editor
//! drives, plus its JSON snapshot form.
//!
//! [`SceneAdapter`] is the seam to whatever canvas runtime hosts the
//! design. [`Scene`] is the in-memory implementation used natively and in
//! tests; a browser host wraps its canvas library behind the same trait.

use crate::color::Color;
use crate::error::SceneError;
use crate::geometry::CanvasSize;
use crate::id::ObjectId;
use crate::model::SceneObject;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const SNAPSHOT_VERSION: u64 = 1;

/// Serialized page content. Opaque to everything but the adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneSnapshot(serde_json::Value);

impl SceneSnapshot {
    /// The snapshot of a blank page.
    pub fn empty() -> Self {
        Self(serde_json::json!({
            "version": SNAPSHOT_VERSION,
            "background": null,
            "objects": [],
        }))
    }

    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// Number of objects recorded, when the snapshot is well formed.
    pub fn object_count(&self) -> Option<usize> {
        self.0.get("objects")?.as_array().map(Vec::len)
    }
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Serialize, Deserialize)]
struct SnapshotBody {
    #[serde(default = "default_version")]
    version: u64,
    #[serde(default)]
    background: Option<Color>,
    #[serde(default)]
    objects: Vec<SceneObject>,
}

fn default_version() -> u64 {
    SNAPSHOT_VERSION
}

/// Operations the editor core needs from a canvas runtime.
///
/// Indices are z-order positions, 0 = back. Operations on ids that are
/// not in the scene are no-ops.
pub trait SceneAdapter {
    fn canvas(&self) -> CanvasSize;

    /// All objects, back to front.
    fn objects(&self) -> &[SceneObject];

    fn object(&self, id: ObjectId) -> Option<&SceneObject>;

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject>;

    fn index_of(&self, id: ObjectId) -> Option<usize>;

    /// Append on top.
    fn add_object(&mut self, object: SceneObject);

    /// Insert at a z-index; indices past the end append.
    fn insert_object_at(&mut self, index: usize, object: SceneObject);

    /// Detach an object, handing ownership back to the caller.
    fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject>;

    fn set_active(&mut self, id: Option<ObjectId>);

    fn active(&self) -> Option<ObjectId>;

    fn serialize(&self) -> SceneSnapshot;

    /// Replace the whole content with a snapshot. On error the scene is
    /// left unchanged.
    fn deserialize(&mut self, snapshot: &SceneSnapshot) -> Result<(), SceneError>;

    /// Recompute cached geometry after properties were written directly.
    fn object_modified(&mut self, _id: ObjectId) {}

    /// Request a repaint.
    fn render(&mut self) {}

    fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Move an object to a z-index. Returns false if it is not present.
    fn move_object_to(&mut self, id: ObjectId, index: usize) -> bool {
        let active = self.active();
        match self.remove_object(id) {
            Some(object) => {
                self.insert_object_at(index, object);
                self.set_active(active);
                true
            }
            None => false,
        }
    }

    /// Position among exported objects, 0 = back. Auxiliary objects
    /// (guides, crop region) have no layer.
    fn layer_of(&self, id: ObjectId) -> Option<usize> {
        self.objects()
            .iter()
            .filter(|o| !o.exclude_from_export)
            .position(|o| o.id == id)
    }

    /// Scene index at which an object lands on `layer`: just below the
    /// exported object currently holding it, or just above the topmost
    /// exported object when `layer` is past the end.
    fn index_for_layer(&self, layer: usize) -> usize {
        let mut seen = 0;
        let mut above_last = 0;
        for (index, object) in self.objects().iter().enumerate() {
            if object.exclude_from_export {
                continue;
            }
            if seen == layer {
                return index;
            }
            seen += 1;
            above_last = index + 1;
        }
        above_last
    }

    fn insert_at_layer(&mut self, layer: usize, object: SceneObject) {
        let index = self.index_for_layer(layer);
        self.insert_object_at(index, object);
    }

    /// Move an exported object to a layer. Returns false if it is not
    /// present.
    fn move_to_layer(&mut self, id: ObjectId, layer: usize) -> bool {
        let active = self.active();
        match self.remove_object(id) {
            Some(object) => {
                self.insert_at_layer(layer, object);
                self.set_active(active);
                true
            }
            None => false,
        }
    }
}

/// In-memory scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    canvas: CanvasSize,
    background: Option<Color>,
    objects: Vec<SceneObject>,
    active: Option<ObjectId>,
    /// Repaints requested so far.
    pub render_requests: u64,
}

impl Scene {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            ..Default::default()
        }
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn set_background(&mut self, color: Option<Color>) {
        self.background = color;
    }

    /// Ids in z-order, excluding auxiliary objects.
    pub fn content_ids(&self) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| !o.exclude_from_export)
            .map(|o| o.id)
            .collect()
    }
}

impl SceneAdapter for Scene {
    fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    fn add_object(&mut self, object: SceneObject) {
        if self.contains(object.id) {
            log::warn!("add_object: {} already in scene", object.id);
            return;
        }
        self.objects.push(object);
    }

    fn insert_object_at(&mut self, index: usize, object: SceneObject) {
        if self.contains(object.id) {
            log::warn!("insert_object_at: {} already in scene", object.id);
            return;
        }
        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
    }

    fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.index_of(id)?;
        if self.active == Some(id) {
            self.active = None;
        }
        Some(self.objects.remove(index))
    }

    fn move_object_to(&mut self, id: ObjectId, index: usize) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        let object = self.objects.remove(from);
        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
        true
    }

    fn set_active(&mut self, id: Option<ObjectId>) {
        self.active = id.filter(|id| self.contains(*id));
    }

    fn active(&self) -> Option<ObjectId> {
        self.active
    }

    fn serialize(&self) -> SceneSnapshot {
        let body = SnapshotBody {
            version: SNAPSHOT_VERSION,
            background: self.background,
            objects: self
                .objects
                .iter()
                .filter(|o| !o.exclude_from_export)
                .cloned()
                .collect(),
        };
        match serde_json::to_value(&body) {
            Ok(value) => SceneSnapshot(value),
            Err(err) => {
                // Only reachable with non-string map keys, which the model has none of.
                log::error!("scene serialization failed: {err}");
                SceneSnapshot::empty()
            }
        }
    }

    fn deserialize(&mut self, snapshot: &SceneSnapshot) -> Result<(), SceneError> {
        let body = SnapshotBody::deserialize(&snapshot.0)?;
        if body.version != SNAPSHOT_VERSION {
            return Err(SceneError::UnsupportedVersion(body.version));
        }
        let mut seen = HashSet::new();
        for object in &body.objects {
            if !seen.insert(object.id) {
                return Err(SceneError::DuplicateId(object.id));
            }
        }
        self.background = body.background;
        self.objects = body.objects;
        self.active = None;
        Ok(())
    }

    fn render(&mut self) {
        self.render_requests += 1;
    }
}
