//! The editor facade.
//!
//! [`Editor`] owns the scene adapter, the command history, the page
//! document and every transient mode (interactive edit, crop, snapping).
//! Operations are split across modules as `impl` blocks: pages in
//! `pages.rs`, canvas events in `events.rs`, cropping in `crop.rs` and so
//! on. This file holds construction, history access and the one-shot
//! object actions.

use crate::commands::{
    AddObject, Command, CommandStack, RemoveObject, ReorderObject, UpdateObject,
};
use crate::config::EditorConfig;
use crate::crop::CropSession;
use crate::error::{EditorError, Notice};
use crate::interactive::EditSession;
use crate::pages::Document;
use crate::snapping::Snapper;
use ivd_core::{
    ObjectId, PropKey, PropValue, PropertySnapshot, Scene, SceneAdapter, SceneObject,
};

pub struct Editor<S: SceneAdapter = Scene> {
    pub(crate) scene: S,
    pub(crate) history: CommandStack,
    pub(crate) document: Document,
    pub(crate) config: EditorConfig,
    /// Open panel gesture (slider drag, color picker).
    pub(crate) interactive: Option<EditSession>,
    /// Snapshot taken on pointer-down, diffed on modify.
    pub(crate) pre_modify: Option<EditSession>,
    pub(crate) snapper: Snapper,
    pub(crate) crop: Option<CropSession>,
    notices: Vec<Notice>,
}

impl Editor<Scene> {
    /// Editor over an in-memory scene with one blank page loaded.
    pub fn new(config: EditorConfig) -> Self {
        let scene = Scene::new(config.canvas);
        let mut editor = Self::with_scene(scene, config);
        if let Err(err) = editor.load_document(Vec::new()) {
            log::error!("loading blank document failed: {err}");
        }
        editor
    }
}

impl Default for Editor<Scene> {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl<S: SceneAdapter> Editor<S> {
    /// Wrap an existing scene. No page is loaded until
    /// [`load_document`](Self::load_document) is called.
    pub fn with_scene(scene: S, config: EditorConfig) -> Self {
        Self {
            scene,
            history: CommandStack::with_max_depth(config.max_history),
            document: Document::default(),
            interactive: None,
            pre_modify: None,
            snapper: Snapper::new(config.snap_threshold, config.guide_color),
            crop: None,
            notices: Vec::new(),
            config,
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Direct scene access for hosts that mutate objects themselves and
    /// report through [`handle_event`](Self::handle_event).
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &CommandStack {
        &self.history
    }

    pub fn active(&self) -> Option<ObjectId> {
        self.scene.active()
    }

    pub fn active_object(&self) -> Option<&SceneObject> {
        self.scene.object(self.scene.active()?)
    }

    /// The active exported object. Guides and the crop region never
    /// count as a selection to edit.
    pub(crate) fn require_active(&self) -> Result<ObjectId, EditorError> {
        self.scene
            .active()
            .filter(|id| self.scene.object(*id).is_some_and(|o| !o.exclude_from_export))
            .ok_or(EditorError::NoActiveObject)
    }

    pub(crate) fn ensure_not_cropping(&self) -> Result<(), EditorError> {
        match self.crop {
            Some(_) => Err(EditorError::CropInProgress),
            None => Ok(()),
        }
    }

    // ─── Notices ─────────────────────────────────────────────────────────

    pub(crate) fn notify(&mut self, notice: Notice) {
        log::warn!("{:?}: {}", notice.level, notice.message);
        self.notices.push(notice);
    }

    /// Drain pending user-facing messages.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Run a command through the history and repaint.
    pub fn execute(&mut self, cmd: Command) {
        self.history.execute(&mut self.scene, cmd);
        self.scene.render();
    }

    pub fn undo(&mut self) -> Option<String> {
        self.settle_transient_modes();
        let desc = self.history.undo(&mut self.scene);
        self.scene.render();
        desc
    }

    pub fn redo(&mut self) -> Option<String> {
        self.settle_transient_modes();
        let desc = self.history.redo(&mut self.scene);
        self.scene.render();
        desc
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Commit an open gesture, leave crop mode and hide guides.
    pub(crate) fn settle_transient_modes(&mut self) {
        self.commit_interactive();
        if self.crop.is_some() {
            let _ = self.cancel_crop();
        }
        self.pre_modify = None;
        self.snapper.hide_all(&mut self.scene);
    }

    // ─── Properties ──────────────────────────────────────────────────────

    /// One-shot change of a single property on the active object.
    /// Returns whether anything changed.
    pub fn set_property(&mut self, key: PropKey, value: PropValue) -> Result<bool, EditorError> {
        let mut snapshot = PropertySnapshot::new();
        snapshot.set(key, value);
        self.set_properties(snapshot)
    }

    /// Change several properties of the active object as one undo step.
    pub fn set_properties(&mut self, values: PropertySnapshot) -> Result<bool, EditorError> {
        self.ensure_not_cropping()?;
        self.commit_interactive();
        let id = self.require_active()?;
        let Some(object) = self.scene.object(id) else {
            return Err(EditorError::NoActiveObject);
        };

        let mut probe = object.clone();
        for (key, value) in values.iter() {
            if !probe.set_prop(*key, value.clone()) {
                return Err(EditorError::UnsupportedProperty(*key));
            }
        }
        let keys: Vec<PropKey> = values.keys().collect();
        let before = PropertySnapshot::capture(object, &keys);
        let after = PropertySnapshot::capture(&probe, &keys);
        let Some((before, after)) = PropertySnapshot::diff(&before, &after) else {
            return Ok(false);
        };
        self.execute(Command::Update(UpdateObject::new(id, before, after)));
        Ok(true)
    }

    /// Flip the lock on the active object.
    pub fn toggle_lock(&mut self) -> Result<bool, EditorError> {
        self.ensure_not_cropping()?;
        let id = self.require_active()?;
        let locked = self.scene.object(id).map(|o| o.locked).ok_or(EditorError::NoActiveObject)?;
        self.set_property(PropKey::Locked, PropValue::Bool(!locked))?;
        Ok(!locked)
    }

    // ─── Object actions ──────────────────────────────────────────────────

    /// Add an object on top and select it. Crop mode is cancelled first.
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        if self.crop.is_some() {
            log::debug!("add_object: leaving crop mode");
            let _ = self.cancel_crop();
        }
        self.commit_interactive();
        let id = object.id;
        self.execute(Command::Add(AddObject::new(object)));
        id
    }

    pub fn delete_active(&mut self) -> Result<ObjectId, EditorError> {
        self.ensure_not_cropping()?;
        self.commit_interactive();
        let id = self.require_active()?;
        let cmd = RemoveObject::new(&self.scene, id).ok_or(EditorError::NoActiveObject)?;
        self.execute(Command::Remove(cmd));
        Ok(id)
    }

    /// Copy the active object, offset it and select the copy.
    pub fn duplicate_active(&mut self) -> Result<ObjectId, EditorError> {
        self.ensure_not_cropping()?;
        let id = self.require_active()?;
        let mut copy = self
            .scene
            .object(id)
            .ok_or(EditorError::NoActiveObject)?
            .duplicate();
        let offset = self.config.duplicate_offset;
        copy.geometry.translate(offset, offset);
        copy.locked = false;
        Ok(self.add_object(copy))
    }

    // ─── Layering ────────────────────────────────────────────────────────

    /// Move the active object to the layer `pick` chooses from
    /// (`current`, `count`). Layers count exported objects only.
    fn reorder_active(&mut self, pick: impl Fn(usize, usize) -> Option<usize>) -> Result<bool, EditorError> {
        self.ensure_not_cropping()?;
        self.commit_interactive();
        let id = self.require_active()?;
        let Some(current) = self.scene.layer_of(id) else {
            return Ok(false);
        };
        let count = self.scene.objects().iter().filter(|o| !o.exclude_from_export).count();
        let Some(to) = pick(current, count) else {
            return Ok(false);
        };
        match ReorderObject::new(&self.scene, id, to) {
            Some(cmd) => {
                self.execute(Command::Reorder(cmd));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Swap with the next content object above. Guides don't count.
    pub fn bring_forward(&mut self) -> Result<bool, EditorError> {
        self.reorder_active(|current, count| Some(current + 1).filter(|&to| to < count))
    }

    pub fn send_backward(&mut self) -> Result<bool, EditorError> {
        self.reorder_active(|current, _| current.checked_sub(1))
    }

    pub fn bring_to_front(&mut self) -> Result<bool, EditorError> {
        self.reorder_active(|_, count| count.checked_sub(1))
    }

    pub fn send_to_back(&mut self) -> Result<bool, EditorError> {
        self.reorder_active(|_, _| Some(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ivd_core::Color;
    use pretty_assertions::assert_eq;

    fn editor_with_three() -> (Editor, [ObjectId; 3]) {
        let mut editor = Editor::default();
        let a = editor.add_object(SceneObject::rect(0.0, 0.0, 10.0, 10.0));
        let b = editor.add_object(SceneObject::rect(20.0, 0.0, 10.0, 10.0));
        let c = editor.add_object(SceneObject::rect(40.0, 0.0, 10.0, 10.0));
        (editor, [a, b, c])
    }

    #[test]
    fn set_property_is_one_undo_step() {
        let (mut editor, [_, _, c]) = editor_with_three();
        let red = Color::rgb(255, 0, 0);
        assert!(editor.set_property(PropKey::Fill, PropValue::Color(Some(red))).unwrap());
        assert_eq!(editor.scene().object(c).unwrap().paint.fill, Some(red));

        // Same value again changes nothing and records nothing.
        let depth = editor.history().undo_len();
        assert!(!editor.set_property(PropKey::Fill, PropValue::Color(Some(red))).unwrap());
        assert_eq!(editor.history().undo_len(), depth);

        editor.undo();
        assert_eq!(editor.scene().object(c).unwrap().paint.fill, Some(Color::BLACK));
    }

    #[test]
    fn auxiliary_objects_are_never_edited() {
        let (mut editor, _) = editor_with_three();
        let mut guide = SceneObject::rect(0.0, 0.0, 0.0, 800.0);
        guide.exclude_from_export = true;
        let guide_id = guide.id;
        editor.scene_mut().add_object(guide);
        editor.scene_mut().set_active(Some(guide_id));
        let depth = editor.history().undo_len();

        assert!(matches!(editor.toggle_lock(), Err(EditorError::NoActiveObject)));
        assert!(matches!(editor.delete_active(), Err(EditorError::NoActiveObject)));
        assert!(matches!(editor.bring_forward(), Err(EditorError::NoActiveObject)));
        assert_eq!(editor.history().undo_len(), depth);
        assert!(!editor.scene().object(guide_id).unwrap().locked);
    }

    #[test]
    fn unsupported_property_is_rejected() {
        let (mut editor, _) = editor_with_three();
        let err = editor.set_property(PropKey::FontSize, PropValue::Number(12.0)).unwrap_err();
        assert!(matches!(err, EditorError::UnsupportedProperty(PropKey::FontSize)));
    }

    #[test]
    fn layering_steps_and_undo() {
        let (mut editor, [a, b, c]) = editor_with_three();
        editor.scene_mut().set_active(Some(a));

        assert!(editor.bring_forward().unwrap());
        assert_eq!(editor.scene().content_ids(), vec![b, a, c]);
        assert!(editor.bring_to_front().unwrap());
        assert_eq!(editor.scene().content_ids(), vec![b, c, a]);
        assert!(!editor.bring_forward().unwrap());

        assert!(editor.send_to_back().unwrap());
        assert_eq!(editor.scene().content_ids(), vec![a, b, c]);
        assert!(!editor.send_backward().unwrap());

        editor.undo();
        editor.undo();
        assert_eq!(editor.scene().content_ids(), vec![b, a, c]);
    }

    #[test]
    fn delete_and_duplicate() {
        let (mut editor, [a, b, c]) = editor_with_three();
        editor.scene_mut().set_active(Some(b));
        let copy = editor.duplicate_active().unwrap();
        assert_eq!(editor.active(), Some(copy));
        assert_eq!(editor.scene().object(copy).unwrap().geometry.left, 30.0);

        editor.delete_active().unwrap();
        assert_eq!(editor.scene().content_ids(), vec![a, b, c]);
        assert_eq!(editor.active(), None);
        assert!(matches!(editor.delete_active(), Err(EditorError::NoActiveObject)));

        editor.undo();
        assert_eq!(editor.active(), Some(copy));
    }

    #[test]
    fn toggle_lock_roundtrip() {
        let (mut editor, [_, _, c]) = editor_with_three();
        assert!(editor.toggle_lock().unwrap());
        assert!(editor.scene().object(c).unwrap().locked);
        assert!(!editor.toggle_lock().unwrap());
        editor.undo();
        assert!(editor.scene().object(c).unwrap().locked);
    }
}
