//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s and runs them
//! against the editor. On macOS `meta` is ⌘; elsewhere `ctrl` plays the
//! same role.

use crate::editor::Editor;
use crate::error::EditorError;
use ivd_core::SceneAdapter;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    Duplicate,
    ToggleLock,

    // ── Z-order ──
    SendBackward,
    BringForward,
    SendToBack,
    BringToFront,

    // ── Modes ──
    /// Apply the crop. [`Editor::run_shortcut`] does not handle it: pixels
    /// are loaded asynchronously, so the host calls
    /// [`Editor::apply_crop`] with its own [`ImageLoader`](crate::ImageLoader).
    ApplyCrop,
    /// Leave crop mode, or drop the selection.
    Escape,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "l" | "L" => Some(ShortcutAction::ToggleLock),
                "[" => Some(ShortcutAction::SendToBack),
                "]" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "[" => Some(ShortcutAction::SendBackward),
                "]" => Some(ShortcutAction::BringForward),
                _ => None,
            };
        }

        if shift {
            return None;
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Enter" => Some(ShortcutAction::ApplyCrop),
            "Escape" => Some(ShortcutAction::Escape),
            _ => None,
        }
    }
}

impl<S: SceneAdapter> Editor<S> {
    /// Run a shortcut. Returns false when it did nothing: empty history,
    /// already at front or back, or [`ShortcutAction::ApplyCrop`], which the
    /// host runs itself through [`apply_crop`](Self::apply_crop).
    pub fn run_shortcut(&mut self, action: ShortcutAction) -> Result<bool, EditorError> {
        // Typing in a text box must not delete the object.
        if self.is_interactive() && action == ShortcutAction::Delete {
            return Ok(false);
        }
        let done = match action {
            ShortcutAction::Undo => self.undo().is_some(),
            ShortcutAction::Redo => self.redo().is_some(),
            ShortcutAction::Delete => self.delete_active().map(|_| true)?,
            ShortcutAction::Duplicate => self.duplicate_active().map(|_| true)?,
            ShortcutAction::ToggleLock => self.toggle_lock().map(|_| true)?,
            ShortcutAction::SendBackward => self.send_backward()?,
            ShortcutAction::BringForward => self.bring_forward()?,
            ShortcutAction::SendToBack => self.send_to_back()?,
            ShortcutAction::BringToFront => self.bring_to_front()?,
            ShortcutAction::ApplyCrop => false,
            ShortcutAction::Escape => {
                if self.is_cropping() {
                    self.cancel_crop()?;
                } else {
                    self.commit_interactive();
                    self.scene.set_active(None);
                    self.scene.render();
                }
                true
            }
        };
        Ok(done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ivd_core::SceneObject;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolve_undo_redo() {
        // Cmd+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", false, false, false, true),
            Some(ShortcutAction::Undo)
        );
        // Ctrl+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", true, false, false, false),
            Some(ShortcutAction::Undo)
        );
        // Cmd+Shift+Z → Redo
        assert_eq!(
            ShortcutMap::resolve("Z", false, true, false, true),
            Some(ShortcutAction::Redo)
        );
        // Ctrl+Y → Redo
        assert_eq!(
            ShortcutMap::resolve("y", true, false, false, false),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn resolve_layering() {
        assert_eq!(
            ShortcutMap::resolve("]", true, false, false, false),
            Some(ShortcutAction::BringForward)
        );
        assert_eq!(
            ShortcutMap::resolve("[", true, true, false, false),
            Some(ShortcutAction::SendToBack)
        );
    }

    #[test]
    fn resolve_unbound() {
        assert_eq!(ShortcutMap::resolve("q", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("Delete", false, true, false, false), None);
    }

    #[test]
    fn apply_crop_is_left_to_the_host() {
        let mut editor = Editor::default();
        assert_eq!(ShortcutMap::resolve("Enter", false, false, false, false), Some(ShortcutAction::ApplyCrop));
        assert!(!editor.run_shortcut(ShortcutAction::ApplyCrop).unwrap());
        assert!(!editor.can_undo());
    }

    #[test]
    fn run_delete_then_undo() {
        let mut editor = Editor::default();
        let id = editor.add_object(SceneObject::rect(0.0, 0.0, 10.0, 10.0));
        assert!(editor.run_shortcut(ShortcutAction::Delete).unwrap());
        assert!(!editor.scene().contains(id));
        assert!(editor.run_shortcut(ShortcutAction::Undo).unwrap());
        assert!(editor.scene().contains(id));
        assert!(editor.run_shortcut(ShortcutAction::Escape).unwrap());
        assert_eq!(editor.active(), None);
    }
}
