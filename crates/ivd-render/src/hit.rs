//! Hit testing: point → object lookup.
//!
//! Walks the scene front-to-back and returns the first object whose
//! bounding box contains the point. Hidden, non-evented and auxiliary
//! objects are never hit.

use ivd_core::{ObjectId, Rect, SceneAdapter, SceneObject};

fn hittable(object: &SceneObject) -> bool {
    object.visible && object.evented && !object.exclude_from_export
}

/// Whether one object takes the pointer at (px, py). Unlike
/// [`hit_test`], auxiliary objects are allowed.
pub fn hits(object: &SceneObject, px: f64, py: f64) -> bool {
    object.visible && object.evented && contains(&object.bounding_box(), px, py)
}

fn contains(b: &Rect, px: f64, py: f64) -> bool {
    px >= b.x0 && px <= b.x1 && py >= b.y0 && py <= b.y1
}

/// Find the topmost object at (px, py). `None` means background.
pub fn hit_test(scene: &impl SceneAdapter, px: f64, py: f64) -> Option<ObjectId> {
    scene
        .objects()
        .iter()
        .rev()
        .filter(|o| hittable(o))
        .find(|o| contains(&o.bounding_box(), px, py))
        .map(|o| o.id)
}

/// All hittable objects whose bounds overlap `area`, back to front.
pub fn hit_test_rect(scene: &impl SceneAdapter, area: Rect) -> Vec<ObjectId> {
    scene
        .objects()
        .iter()
        .filter(|o| hittable(o))
        .filter(|o| {
            let b = o.bounding_box();
            b.x0 < area.x1 && b.x1 > area.x0 && b.y0 < area.y1 && b.y1 > area.y0
        })
        .map(|o| o.id)
        .collect()
}
