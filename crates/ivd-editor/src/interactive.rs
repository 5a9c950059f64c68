//! Continuous edits from panel controls.
//!
//! A slider drag or color-picker session fires many intermediate values.
//! They are applied to the live object immediately but only the net change
//! is recorded, as one update command, when the session is committed.

use crate::commands::{Command, UpdateObject};
use crate::editor::Editor;
use crate::error::EditorError;
use ivd_core::{ObjectId, PropKey, PropValue, PropertySnapshot, SceneAdapter};

/// Pre-change values of one object, waiting to be diffed.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub target: ObjectId,
    pub before: PropertySnapshot,
}

impl EditSession {
    pub fn begin(scene: &dyn SceneAdapter, target: ObjectId, keys: &[PropKey]) -> Option<Self> {
        let object = scene.object(target)?;
        Some(Self {
            target,
            before: PropertySnapshot::capture(object, keys),
        })
    }

    /// Capture `key` too if the session has not seen it yet.
    fn track(&mut self, scene: &dyn SceneAdapter, key: PropKey) {
        if self.before.get(key).is_some() {
            return;
        }
        if let Some(value) = scene.object(self.target).and_then(|o| o.get_prop(key)) {
            self.before.set(key, value);
        }
    }

    /// The update command for the net change, if anything changed and the
    /// target still exists.
    pub fn finish(self, scene: &dyn SceneAdapter) -> Option<Command> {
        let object = scene.object(self.target)?;
        let keys: Vec<PropKey> = self.before.keys().collect();
        let after = PropertySnapshot::capture(object, &keys);
        let (before, after) = PropertySnapshot::diff(&self.before, &after)?;
        Some(Command::Update(UpdateObject::new(self.target, before, after)))
    }
}

impl<S: SceneAdapter> Editor<S> {
    /// Start a gesture on the active object. A session left open by the
    /// previous gesture is committed first.
    pub fn begin_interactive(&mut self, keys: &[PropKey]) -> Result<(), EditorError> {
        self.ensure_not_cropping()?;
        if self.interactive.is_some() {
            log::debug!("begin_interactive: committing stale session");
            self.commit_interactive();
        }
        let id = self.require_active()?;
        self.interactive = EditSession::begin(&self.scene, id, keys);
        Ok(())
    }

    /// Apply an intermediate value without recording it.
    pub fn interactive_change(&mut self, key: PropKey, value: PropValue) -> Result<(), EditorError> {
        if self.interactive.is_none() {
            self.begin_interactive(&[key])?;
        }
        let Some(session) = self.interactive.as_mut() else {
            return Err(EditorError::NoActiveObject);
        };
        session.track(&self.scene, key);
        let target = session.target;
        let Some(object) = self.scene.object_mut(target) else {
            self.interactive = None;
            return Err(EditorError::NoActiveObject);
        };
        if !object.set_prop(key, value) {
            return Err(EditorError::UnsupportedProperty(key));
        }
        self.scene.object_modified(target);
        self.scene.render();
        Ok(())
    }

    /// End the gesture: record one update for the net change. Returns
    /// whether a command was pushed.
    pub fn commit_interactive(&mut self) -> bool {
        let Some(session) = self.interactive.take() else {
            return false;
        };
        match session.finish(&self.scene) {
            Some(cmd) => {
                self.execute(cmd);
                true
            }
            None => false,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive.is_some()
    }
}

#[cfg(test)]
mod tests {
    use crate::Editor;
    use ivd_core::{PropKey, PropValue, SceneAdapter, SceneObject};
    use pretty_assertions::assert_eq;

    #[test]
    fn slider_drag_records_one_step() {
        let mut editor = Editor::default();
        let id = editor.add_object(SceneObject::text("Hello", 0.0, 0.0, 200.0, 40.0));
        let depth = editor.history().undo_len();

        editor.begin_interactive(&[PropKey::FontSize]).unwrap();
        for size in [33.0, 40.0, 52.0, 48.0] {
            editor.interactive_change(PropKey::FontSize, PropValue::Number(size)).unwrap();
        }
        assert_eq!(editor.history().undo_len(), depth);
        assert!(editor.commit_interactive());
        assert_eq!(editor.history().undo_len(), depth + 1);

        editor.undo();
        let font_size = editor.scene().object(id).unwrap().text_props().unwrap().font_size;
        assert_eq!(font_size, 32.0);
    }

    #[test]
    fn back_to_start_records_nothing() {
        let mut editor = Editor::default();
        editor.add_object(SceneObject::rect(0.0, 0.0, 10.0, 10.0));
        let depth = editor.history().undo_len();
        editor.interactive_change(PropKey::Angle, PropValue::Number(30.0)).unwrap();
        editor.interactive_change(PropKey::Angle, PropValue::Number(0.0)).unwrap();
        assert!(!editor.commit_interactive());
        assert_eq!(editor.history().undo_len(), depth);
    }

    #[test]
    fn stale_session_is_committed_on_begin() {
        let mut editor = Editor::default();
        let id = editor.add_object(SceneObject::rect(0.0, 0.0, 10.0, 10.0));
        let depth = editor.history().undo_len();
        editor.begin_interactive(&[PropKey::Angle]).unwrap();
        editor.interactive_change(PropKey::Angle, PropValue::Number(15.0)).unwrap();
        // Released outside the window: no commit arrived.
        editor.begin_interactive(&[PropKey::StrokeWidth]).unwrap();
        assert_eq!(editor.history().undo_len(), depth + 1);
        assert!(editor.is_interactive());
        assert_eq!(editor.scene().object(id).unwrap().geometry.angle, 15.0);
    }

    #[test]
    fn untracked_keys_are_picked_up() {
        let mut editor = Editor::default();
        let id = editor.add_object(SceneObject::rect(0.0, 0.0, 10.0, 10.0));
        editor.begin_interactive(&[PropKey::Left]).unwrap();
        editor.interactive_change(PropKey::Top, PropValue::Number(50.0)).unwrap();
        editor.commit_interactive();
        editor.undo();
        assert_eq!(editor.scene().object(id).unwrap().geometry.top, 0.0);
        assert_eq!(editor.scene().active(), Some(id));
    }
}
