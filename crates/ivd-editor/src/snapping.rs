//! Canvas snapping and alignment guides.
//!
//! While an object is dragged its bounding box is compared against the
//! canvas center lines and edges. On each axis the nearest candidate
//! within the threshold wins and the object is shifted onto it. Guides
//! are auxiliary line objects, excluded from export, created on first
//! use and hidden again when the pointer is released.

use crate::editor::Editor;
use ivd_core::{
    CanvasSize, Color, Geometry, ObjectId, ObjectKind, Rect, SceneAdapter, SceneObject,
};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideKind {
    /// Vertical line through the canvas center.
    CenterX,
    /// Horizontal line through the canvas center.
    CenterY,
    Left,
    Right,
    Top,
    Bottom,
}

impl GuideKind {
    pub const ALL: [GuideKind; 6] = [
        GuideKind::CenterX,
        GuideKind::CenterY,
        GuideKind::Left,
        GuideKind::Right,
        GuideKind::Top,
        GuideKind::Bottom,
    ];

    pub fn is_vertical(self) -> bool {
        matches!(self, GuideKind::CenterX | GuideKind::Left | GuideKind::Right)
    }

    /// Line geometry: zero width for vertical guides, zero height for
    /// horizontal ones.
    fn geometry(self, canvas: CanvasSize) -> Geometry {
        let (w, h) = (canvas.width, canvas.height);
        match self {
            GuideKind::CenterX => Geometry::new(w / 2.0, 0.0, 0.0, h),
            GuideKind::Left => Geometry::new(0.0, 0.0, 0.0, h),
            GuideKind::Right => Geometry::new(w, 0.0, 0.0, h),
            GuideKind::CenterY => Geometry::new(0.0, h / 2.0, w, 0.0),
            GuideKind::Top => Geometry::new(0.0, 0.0, w, 0.0),
            GuideKind::Bottom => Geometry::new(0.0, h, w, 0.0),
        }
    }
}

/// Offset to apply and the guides that caused it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapResult {
    pub dx: f64,
    pub dy: f64,
    pub guides: SmallVec<[GuideKind; 2]>,
}

impl SnapResult {
    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }
}

/// Nearest snap per axis for a bounding box. Ties go to the center line.
pub fn compute_snap(bbox: Rect, canvas: CanvasSize, threshold: f64) -> SnapResult {
    let center = bbox.center();
    let x_candidates = [
        (GuideKind::CenterX, canvas.width / 2.0 - center.x),
        (GuideKind::Left, -bbox.x0),
        (GuideKind::Right, canvas.width - bbox.x1),
    ];
    let y_candidates = [
        (GuideKind::CenterY, canvas.height / 2.0 - center.y),
        (GuideKind::Top, -bbox.y0),
        (GuideKind::Bottom, canvas.height - bbox.y1),
    ];

    let nearest = |candidates: [(GuideKind, f64); 3]| {
        candidates
            .into_iter()
            .filter(|(_, delta)| delta.abs() <= threshold)
            .min_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
    };

    let mut result = SnapResult::default();
    if let Some((kind, dx)) = nearest(x_candidates) {
        result.dx = dx;
        result.guides.push(kind);
    }
    if let Some((kind, dy)) = nearest(y_candidates) {
        result.dy = dy;
        result.guides.push(kind);
    }
    result
}

/// Owns the guide objects of the current page.
#[derive(Debug, Clone)]
pub struct Snapper {
    threshold: f64,
    color: Color,
    guides: SmallVec<[(GuideKind, ObjectId); 6]>,
}

impl Snapper {
    pub fn new(threshold: f64, color: Color) -> Self {
        Self {
            threshold,
            color,
            guides: SmallVec::new(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn guide(&self, kind: GuideKind) -> Option<ObjectId> {
        self.guides.iter().find(|(k, _)| *k == kind).map(|(_, id)| *id)
    }

    /// Guides currently shown.
    pub fn visible_guides(&self, scene: &dyn SceneAdapter) -> Vec<GuideKind> {
        self.guides
            .iter()
            .filter(|(_, id)| scene.object(*id).is_some_and(|o| o.visible))
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Snap the object being dragged. Returns the applied offset.
    pub fn snap_moving(&mut self, scene: &mut dyn SceneAdapter, id: ObjectId) -> SnapResult {
        let canvas = scene.canvas();
        let Some(object) = scene.object(id) else {
            return SnapResult::default();
        };
        if object.locked || object.exclude_from_export {
            return SnapResult::default();
        }
        let result = compute_snap(object.bounding_box(), canvas, self.threshold);

        if (result.dx != 0.0 || result.dy != 0.0)
            && let Some(object) = scene.object_mut(id)
        {
            object.geometry.translate(result.dx, result.dy);
            scene.object_modified(id);
        }
        self.show(scene, &result.guides);
        result
    }

    /// Show exactly `active`, on top of everything else.
    pub fn show(&mut self, scene: &mut dyn SceneAdapter, active: &[GuideKind]) {
        if active.is_empty() {
            self.hide_all(scene);
            return;
        }
        self.ensure_guides(scene);
        for &(kind, id) in &self.guides {
            let on = active.contains(&kind);
            if let Some(guide) = scene.object_mut(id) {
                guide.visible = on;
            }
            if on {
                let top = scene.objects().len().saturating_sub(1);
                scene.move_object_to(id, top);
            }
        }
    }

    pub fn hide_all(&mut self, scene: &mut dyn SceneAdapter) {
        for &(_, id) in &self.guides {
            if let Some(guide) = scene.object_mut(id) {
                guide.visible = false;
            }
        }
    }

    /// Forget guide handles after the scene content was replaced.
    pub fn reset(&mut self) {
        self.guides.clear();
    }

    /// Create any guide that does not exist in the scene yet.
    fn ensure_guides(&mut self, scene: &mut dyn SceneAdapter) {
        self.guides.retain(|(_, id)| scene.contains(*id));
        let canvas = scene.canvas();
        for kind in GuideKind::ALL {
            if self.guide(kind).is_some() {
                continue;
            }
            let mut line = SceneObject::new(
                ObjectId::with_prefix("guide"),
                ObjectKind::Line,
                kind.geometry(canvas),
            );
            line.paint.fill = None;
            line.paint.stroke = Some(self.color);
            line.selectable = false;
            line.evented = false;
            line.visible = false;
            line.exclude_from_export = true;
            self.guides.push((kind, line.id));
            scene.add_object(line);
        }
    }
}

impl<S: SceneAdapter> Editor<S> {
    pub fn guide(&self, kind: GuideKind) -> Option<ObjectId> {
        self.snapper.guide(kind)
    }

    /// Guides currently shown, in [`GuideKind::ALL`] order.
    pub fn visible_guides(&self) -> Vec<GuideKind> {
        self.snapper.visible_guides(&self.scene)
    }
}
