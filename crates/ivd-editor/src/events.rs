//! Canvas runtime events and how the editor reacts to them.
//!
//! The host forwards what its canvas library reports. Direct manipulation
//! (drag, resize, rotate) is recorded as one update per gesture: the
//! tracked properties are captured on pointer-down and diffed when the
//! runtime reports the object as modified.

use crate::editor::Editor;
use crate::interactive::EditSession;
use ivd_core::{ObjectId, PropKey, Rect, SceneAdapter};
use ivd_render::{hit_test, hit_test_rect, hits};

#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    SelectionCreated { id: ObjectId },
    SelectionUpdated { id: ObjectId },
    SelectionCleared,
    MouseDown { target: Option<ObjectId>, x: f64, y: f64 },
    /// The runtime moved the object during a drag.
    ObjectMoving { id: ObjectId },
    /// A gesture on the object ended.
    ObjectModified { id: ObjectId },
    MouseUp { x: f64, y: f64 },
}

impl<S: SceneAdapter> Editor<S> {
    pub fn handle_event(&mut self, event: CanvasEvent) {
        if self.history.is_processing() {
            log::trace!("ignoring {event:?} raised by a running command");
            return;
        }
        match event {
            CanvasEvent::SelectionCreated { id } | CanvasEvent::SelectionUpdated { id } => {
                self.select(id);
            }
            CanvasEvent::SelectionCleared => {
                self.commit_interactive();
                self.scene.set_active(None);
            }
            CanvasEvent::MouseDown { target, .. } => {
                if self.interactive.as_ref().is_some_and(|s| Some(s.target) != target) {
                    self.commit_interactive();
                }
                self.pre_modify = target
                    .filter(|id| self.scene.object(*id).is_some_and(|o| !o.exclude_from_export))
                    .and_then(|id| EditSession::begin(&self.scene, id, PropKey::TRACKED));
            }
            CanvasEvent::ObjectMoving { id } => {
                self.snapper.snap_moving(&mut self.scene, id);
                self.scene.render();
            }
            CanvasEvent::ObjectModified { id } => {
                match self.pre_modify.take() {
                    Some(session) if session.target == id => {
                        if let Some(cmd) = session.finish(&self.scene) {
                            self.execute(cmd);
                        }
                    }
                    Some(session) => {
                        log::debug!("modified {id} but pointer went down on {}", session.target);
                    }
                    None => log::debug!("modified {id} without a pointer-down snapshot"),
                }
            }
            CanvasEvent::MouseUp { .. } => {
                self.snapper.hide_all(&mut self.scene);
                self.scene.render();
            }
        }
    }

    /// Topmost evented object under a canvas point. While cropping only
    /// the crop region takes the pointer.
    pub fn object_at(&self, x: f64, y: f64) -> Option<ObjectId> {
        if let Some(session) = &self.crop {
            return self
                .scene
                .object(session.region)
                .filter(|region| hits(region, x, y))
                .map(|region| region.id);
        }
        hit_test(&self.scene, x, y)
    }

    /// Objects touching a marquee rectangle, bottom to top.
    pub fn objects_in(&self, area: Rect) -> Vec<ObjectId> {
        hit_test_rect(&self.scene, area)
    }

    /// Make `id` the active object. An open gesture on another object is
    /// committed first.
    pub fn select(&mut self, id: ObjectId) {
        if self.interactive.as_ref().is_some_and(|s| s.target != id) {
            self.commit_interactive();
        }
        if self.scene.object(id).is_some_and(|o| o.selectable) {
            self.scene.set_active(Some(id));
        }
    }
}
