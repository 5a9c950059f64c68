//! Integration tests: command history laws through the editor facade.

use ivd_core::{Color, PropKey, PropValue, SceneAdapter, SceneObject};
use ivd_editor::{CanvasEvent, Editor};
use pretty_assertions::assert_eq;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn five_rects(editor: &mut Editor) -> Vec<ivd_core::ObjectId> {
    (0..5)
        .map(|i| editor.add_object(SceneObject::rect(i as f64 * 50.0, 0.0, 40.0, 40.0)))
        .collect()
}

// ─── Inverse law ─────────────────────────────────────────────────────────

#[test]
fn undo_all_then_redo_all_restores_final_state() {
    init();
    let mut editor = Editor::default();
    let ids = five_rects(&mut editor);

    editor.scene_mut().set_active(Some(ids[1]));
    editor.set_property(PropKey::Fill, PropValue::Color(Some(Color::rgb(200, 10, 10)))).unwrap();
    editor.bring_to_front().unwrap();
    editor.scene_mut().set_active(Some(ids[3]));
    editor.delete_active().unwrap();
    editor.scene_mut().set_active(Some(ids[0]));
    editor.duplicate_active().unwrap();

    let final_state = editor.scene().objects().to_vec();
    let n = editor.history().undo_len();

    for _ in 0..n {
        assert!(editor.undo().is_some());
    }
    assert!(editor.scene().objects().is_empty());
    assert!(editor.undo().is_none());

    for _ in 0..n {
        assert!(editor.redo().is_some());
    }
    assert_eq!(editor.scene().objects(), final_state.as_slice());
}

#[test]
fn new_action_invalidates_redo() {
    init();
    let mut editor = Editor::default();
    let id = editor.add_object(SceneObject::rect(0.0, 0.0, 10.0, 10.0));
    editor.set_property(PropKey::Angle, PropValue::Number(10.0)).unwrap();
    editor.set_property(PropKey::Angle, PropValue::Number(20.0)).unwrap();
    editor.undo();
    assert!(editor.can_redo());

    editor.set_property(PropKey::StrokeWidth, PropValue::Number(3.0)).unwrap();
    assert!(!editor.can_redo());
    assert_eq!(editor.redo(), None);
    assert_eq!(editor.scene().object(id).unwrap().geometry.angle, 10.0);
}

#[test]
fn removed_object_returns_to_its_layer() {
    init();
    let mut editor = Editor::default();
    let ids = five_rects(&mut editor);
    editor.scene_mut().set_active(Some(ids[2]));
    editor.delete_active().unwrap();
    assert_eq!(editor.scene().index_of(ids[2]), None);

    editor.undo();
    assert_eq!(editor.scene().content_ids(), ids);
    assert_eq!(editor.active(), Some(ids[2]));
}

/// Drag `id` by `(dx, dy)` as the canvas runtime reports it.
fn drag(editor: &mut Editor, id: ivd_core::ObjectId, dx: f64, dy: f64) {
    editor.handle_event(CanvasEvent::MouseDown { target: Some(id), x: 0.0, y: 0.0 });
    editor.scene_mut().object_mut(id).unwrap().geometry.translate(dx, dy);
    editor.handle_event(CanvasEvent::ObjectMoving { id });
    editor.handle_event(CanvasEvent::ObjectModified { id });
    editor.handle_event(CanvasEvent::MouseUp { x: 0.0, y: 0.0 });
}

#[test]
fn removed_object_returns_to_its_layer_after_guides_move() {
    init();
    let mut editor = Editor::default();
    let a = editor.add_object(SceneObject::rect(553.0, 100.0, 100.0, 50.0));
    // Snaps to the vertical center; the guides now sit above `a`.
    drag(&mut editor, a, 1.0, 0.0);
    assert_eq!(editor.scene().object(a).unwrap().geometry.left, 550.0);
    let b = editor.add_object(SceneObject::rect(0.0, 0.0, 40.0, 40.0));
    let c = editor.add_object(SceneObject::rect(60.0, 0.0, 40.0, 40.0));

    editor.scene_mut().set_active(Some(b));
    editor.delete_active().unwrap();
    // Snapping again raises the lit guides above `c`.
    drag(&mut editor, a, 0.0, 272.0);
    assert_eq!(editor.scene().object(a).unwrap().geometry.top, 375.0);

    editor.undo();
    editor.undo();
    assert_eq!(editor.scene().content_ids(), vec![a, b, c]);
    assert_eq!(editor.scene().object(a).unwrap().geometry.top, 100.0);
}

// ─── Gestures ────────────────────────────────────────────────────────────

#[test]
fn gesture_records_only_start_and_end_values() {
    init();
    let mut editor = Editor::default();
    let id = editor.add_object(SceneObject::text("Save the date", 100.0, 100.0, 400.0, 60.0));
    let depth = editor.history().undo_len();

    editor.begin_interactive(&[PropKey::Fill]).unwrap();
    for shade in [10u8, 90, 170] {
        editor
            .interactive_change(PropKey::Fill, PropValue::Color(Some(Color::rgb(shade, 0, 0))))
            .unwrap();
    }
    editor.commit_interactive();
    assert_eq!(editor.history().undo_len(), depth + 1);

    let Some(ivd_editor::Command::Update(update)) = editor.history().peek_undo() else {
        panic!("expected an update on top of the history");
    };
    assert_eq!(
        update.before().get(PropKey::Fill),
        Some(&PropValue::Color(Some(Color::BLACK)))
    );
    assert_eq!(
        update.after().get(PropKey::Fill),
        Some(&PropValue::Color(Some(Color::rgb(170, 0, 0))))
    );
    assert_eq!(update.after().len(), 1);
    assert_eq!(editor.scene().object(id).unwrap().paint.fill, Some(Color::rgb(170, 0, 0)));
}

#[test]
fn gesture_back_to_start_is_silent() {
    init();
    let mut editor = Editor::default();
    editor.add_object(SceneObject::rect(0.0, 0.0, 10.0, 10.0));
    let depth = editor.history().undo_len();

    editor.begin_interactive(&[PropKey::StrokeWidth]).unwrap();
    editor.interactive_change(PropKey::StrokeWidth, PropValue::Number(8.0)).unwrap();
    editor.interactive_change(PropKey::StrokeWidth, PropValue::Number(1.0)).unwrap();
    assert!(!editor.commit_interactive());
    assert_eq!(editor.history().undo_len(), depth);
}

#[test]
fn click_outside_commits_abandoned_gesture() {
    init();
    let mut editor = Editor::default();
    let id = editor.add_object(SceneObject::rect(0.0, 0.0, 10.0, 10.0));
    let depth = editor.history().undo_len();
    editor.begin_interactive(&[PropKey::Angle]).unwrap();
    editor.interactive_change(PropKey::Angle, PropValue::Number(45.0)).unwrap();

    editor.handle_event(CanvasEvent::MouseDown { target: None, x: 900.0, y: 700.0 });
    editor.handle_event(CanvasEvent::SelectionCleared);
    assert_eq!(editor.history().undo_len(), depth + 1);

    editor.undo();
    assert_eq!(editor.scene().object(id).unwrap().geometry.angle, 0.0);
}
