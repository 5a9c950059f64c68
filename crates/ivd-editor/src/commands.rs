//! Undo/Redo command stack.
//!
//! Every scene mutation that should be undoable is wrapped in a
//! [`Command`] that knows how to apply and reverse itself. Commands are
//! executed through the [`CommandStack`], which owns them for their whole
//! life: on the undo stack after execution, on the redo stack after undo,
//! dropped when a fresh action clears the redo stack.
//!
//! Commands address objects by [`ObjectId`]. While an object is detached
//! from the scene (removed, replaced, or an add that was undone) the
//! command owns it; once it is back in the scene only the handle remains.
//! An operation whose target is gone degrades to a no-op.
//!
//! Positions are layers: z-order among exported objects only. Guides and
//! the crop region move around on their own, so a raw scene index taken
//! now could point somewhere else by the time the command is undone.

use ivd_core::{ObjectId, PropertySnapshot, SceneAdapter, SceneObject};

// ─── Command variants ────────────────────────────────────────────────────

/// Insert an object on top and select it.
#[derive(Debug, Clone)]
pub struct AddObject {
    id: ObjectId,
    detached: Option<SceneObject>,
}

impl AddObject {
    pub fn new(object: SceneObject) -> Self {
        Self {
            id: object.id,
            detached: Some(object),
        }
    }

    fn execute(&mut self, scene: &mut dyn SceneAdapter) {
        if scene.contains(self.id) {
            return;
        }
        if let Some(object) = self.detached.take() {
            scene.add_object(object);
            scene.set_active(Some(self.id));
        }
    }

    fn undo(&mut self, scene: &mut dyn SceneAdapter) {
        if let Some(object) = scene.remove_object(self.id) {
            self.detached = Some(object);
        }
    }
}

/// Detach an object; undo puts it back at the same layer and restores
/// its selection.
#[derive(Debug, Clone)]
pub struct RemoveObject {
    id: ObjectId,
    layer: usize,
    was_active: bool,
    detached: Option<SceneObject>,
}

impl RemoveObject {
    /// Capture the layer and selection state. `None` if the object is
    /// not in the scene or is auxiliary.
    pub fn new(scene: &dyn SceneAdapter, id: ObjectId) -> Option<Self> {
        Some(Self {
            id,
            layer: scene.layer_of(id)?,
            was_active: scene.active() == Some(id),
            detached: None,
        })
    }

    fn execute(&mut self, scene: &mut dyn SceneAdapter) {
        if let Some(object) = scene.remove_object(self.id) {
            self.detached = Some(object);
        }
    }

    fn undo(&mut self, scene: &mut dyn SceneAdapter) {
        if let Some(object) = self.detached.take() {
            scene.insert_at_layer(self.layer, object);
            if self.was_active {
                scene.set_active(Some(self.id));
            }
        }
    }
}

/// Property-level change. `before` and `after` hold exactly the
/// properties that changed.
#[derive(Debug, Clone)]
pub struct UpdateObject {
    id: ObjectId,
    before: PropertySnapshot,
    after: PropertySnapshot,
}

impl UpdateObject {
    pub fn new(id: ObjectId, before: PropertySnapshot, after: PropertySnapshot) -> Self {
        Self { id, before, after }
    }

    pub fn before(&self) -> &PropertySnapshot {
        &self.before
    }

    pub fn after(&self) -> &PropertySnapshot {
        &self.after
    }

    fn apply(id: ObjectId, snapshot: &PropertySnapshot, scene: &mut dyn SceneAdapter) {
        if let Some(object) = scene.object_mut(id) {
            object.apply(snapshot);
            scene.object_modified(id);
        }
    }
}

/// Swap one object for another at the same layer. Used when the object
/// itself changes (crop, image replace), not just its properties.
#[derive(Debug, Clone)]
pub struct ReplaceObject {
    old_id: ObjectId,
    new_id: ObjectId,
    layer: usize,
    old_detached: Option<SceneObject>,
    new_detached: Option<SceneObject>,
}

impl ReplaceObject {
    /// `None` if `old_id` is not an exported object in the scene.
    pub fn new(scene: &dyn SceneAdapter, old_id: ObjectId, replacement: SceneObject) -> Option<Self> {
        Some(Self {
            old_id,
            new_id: replacement.id,
            layer: scene.layer_of(old_id)?,
            old_detached: None,
            new_detached: Some(replacement),
        })
    }

    pub fn new_id(&self) -> ObjectId {
        self.new_id
    }

    fn swap(
        scene: &mut dyn SceneAdapter,
        out_id: ObjectId,
        out_slot: &mut Option<SceneObject>,
        in_slot: &mut Option<SceneObject>,
        layer: usize,
    ) {
        let Some(incoming) = in_slot.take() else {
            return;
        };
        let Some(outgoing) = scene.remove_object(out_id) else {
            log::debug!("replace: {out_id} already gone, skipping");
            *in_slot = Some(incoming);
            return;
        };
        *out_slot = Some(outgoing);
        let in_id = incoming.id;
        scene.insert_at_layer(layer, incoming);
        scene.set_active(Some(in_id));
    }
}

/// Change of layer.
#[derive(Debug, Clone)]
pub struct ReorderObject {
    id: ObjectId,
    from: usize,
    to: usize,
}

impl ReorderObject {
    /// `None` if the object has no layer or is already at `to`.
    pub fn new(scene: &dyn SceneAdapter, id: ObjectId, to: usize) -> Option<Self> {
        let from = scene.layer_of(id)?;
        (from != to).then_some(Self { id, from, to })
    }
}

/// An undoable scene mutation.
#[derive(Debug, Clone)]
pub enum Command {
    Add(AddObject),
    Remove(RemoveObject),
    Update(UpdateObject),
    Replace(ReplaceObject),
    Reorder(ReorderObject),
}

impl Command {
    pub fn execute(&mut self, scene: &mut dyn SceneAdapter) {
        match self {
            Command::Add(c) => c.execute(scene),
            Command::Remove(c) => c.execute(scene),
            Command::Update(c) => UpdateObject::apply(c.id, &c.after, scene),
            Command::Replace(c) => ReplaceObject::swap(
                scene,
                c.old_id,
                &mut c.old_detached,
                &mut c.new_detached,
                c.layer,
            ),
            Command::Reorder(c) => {
                scene.move_to_layer(c.id, c.to);
            }
        }
    }

    pub fn undo(&mut self, scene: &mut dyn SceneAdapter) {
        match self {
            Command::Add(c) => c.undo(scene),
            Command::Remove(c) => c.undo(scene),
            Command::Update(c) => UpdateObject::apply(c.id, &c.before, scene),
            Command::Replace(c) => ReplaceObject::swap(
                scene,
                c.new_id,
                &mut c.new_detached,
                &mut c.old_detached,
                c.layer,
            ),
            Command::Reorder(c) => {
                scene.move_to_layer(c.id, c.from);
            }
        }
    }

    pub fn description(&self) -> String {
        match self {
            Command::Add(c) => format!("add {}", c.id),
            Command::Remove(c) => format!("remove {}", c.id),
            Command::Update(c) => {
                let keys: Vec<_> = c.after.keys().map(|k| format!("{k:?}")).collect();
                format!("update {} ({})", c.id, keys.join(", "))
            }
            Command::Replace(c) => format!("replace {} with {}", c.old_id, c.new_id),
            Command::Reorder(c) => format!("move {} to layer {}", c.id, c.to),
        }
    }
}

// ─── Stack ───────────────────────────────────────────────────────────────

/// Undo and redo stacks. Nothing else mutates them.
#[derive(Debug, Default)]
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth; `None` keeps everything.
    max_depth: Option<usize>,
    /// Set while a command runs. Scene events raised meanwhile are echoes
    /// of the command itself and must not be turned into new commands.
    processing: bool,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Run a command, push it for undo and drop any redo history.
    pub fn execute(&mut self, scene: &mut dyn SceneAdapter, mut cmd: Command) {
        if self.processing {
            log::warn!("re-entrant execute ignored: {}", cmd.description());
            return;
        }
        self.processing = true;
        cmd.execute(scene);
        self.processing = false;
        log::debug!("execute: {}", cmd.description());

        self.undo_stack.push(cmd);
        if let Some(max) = self.max_depth
            && self.undo_stack.len() > max
        {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Undo the last command. Returns its description, or `None` when
    /// there is nothing to undo.
    pub fn undo(&mut self, scene: &mut dyn SceneAdapter) -> Option<String> {
        if self.processing {
            return None;
        }
        let mut cmd = self.undo_stack.pop()?;
        self.processing = true;
        cmd.undo(scene);
        self.processing = false;
        let desc = cmd.description();
        log::debug!("undo: {desc}");
        self.redo_stack.push(cmd);
        Some(desc)
    }

    /// Redo the most recently undone command.
    pub fn redo(&mut self, scene: &mut dyn SceneAdapter) -> Option<String> {
        if self.processing {
            return None;
        }
        let mut cmd = self.redo_stack.pop()?;
        self.processing = true;
        cmd.execute(scene);
        self.processing = false;
        let desc = cmd.description();
        log::debug!("redo: {desc}");
        self.undo_stack.push(cmd);
        Some(desc)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// The command `undo` would reverse next.
    pub fn peek_undo(&self) -> Option<&Command> {
        self.undo_stack.last()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Forget all history (page switch, document load).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
