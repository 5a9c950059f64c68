//! Integration tests: multi-page documents.

use ivd_core::{SceneAdapter, SceneObject, SceneSnapshot};
use ivd_editor::{Editor, Page};
use pretty_assertions::assert_eq;

#[test]
fn page_switch_round_trip() {
    let mut editor = Editor::default();
    let a = editor.add_object(SceneObject::rect(0.0, 0.0, 10.0, 10.0));
    let b = editor.add_object(SceneObject::text("B", 0.0, 0.0, 10.0, 10.0));

    editor.add_page().unwrap();
    let c = editor.add_object(SceneObject::circle(0.0, 0.0, 5.0));

    editor.switch_to(0).unwrap();
    assert_eq!(editor.scene().content_ids(), vec![a, b]);
    editor.switch_to(1).unwrap();
    assert_eq!(editor.scene().content_ids(), vec![c]);
}

#[test]
fn switch_resets_history_but_not_on_same_page() {
    let mut editor = Editor::default();
    editor.add_object(SceneObject::rect(0.0, 0.0, 10.0, 10.0));
    editor.switch_to(0).unwrap();
    assert!(editor.can_undo());

    editor.add_page().unwrap();
    assert!(!editor.can_undo());
    editor.switch_to(0).unwrap();
    assert!(!editor.can_undo());
    assert_eq!(editor.scene().objects().len(), 1);
}

#[test]
fn save_includes_unsaved_live_edits() {
    let mut editor = Editor::default();
    editor.add_page().unwrap();
    editor.add_object(SceneObject::rect(0.0, 0.0, 10.0, 10.0));
    editor.add_object(SceneObject::rect(5.0, 5.0, 10.0, 10.0));

    let pages = editor.pages_for_save();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].data.object_count(), Some(0));
    assert_eq!(pages[1].data.object_count(), Some(2));
}

#[test]
fn saved_document_reloads() {
    let mut editor = Editor::default();
    let id = editor.add_object(SceneObject::text("Ana & Luis", 100.0, 80.0, 500.0, 60.0));
    editor.rename_page(0, "Front").unwrap();
    editor.add_page().unwrap();
    editor.rename_page(1, "Back").unwrap();

    let json = serde_json::to_string(&editor.pages_for_save()).unwrap();
    let pages: Vec<Page> = serde_json::from_str(&json).unwrap();

    let mut reopened = Editor::default();
    reopened.load_document(pages).unwrap();
    assert_eq!(reopened.document().len(), 2);
    assert_eq!(reopened.document().pages()[1].name, "Back");
    assert_eq!(reopened.scene().content_ids(), vec![id]);
    assert!(!reopened.can_undo());
}

#[test]
fn guides_never_reach_saved_pages() {
    use ivd_editor::CanvasEvent;
    let mut editor = Editor::default();
    let id = editor.add_object(SceneObject::rect(3.0, 3.0, 10.0, 10.0));
    editor.handle_event(CanvasEvent::MouseDown { target: Some(id), x: 5.0, y: 5.0 });
    editor.handle_event(CanvasEvent::ObjectMoving { id });
    assert!(editor.scene().objects().len() > 1);

    let pages = editor.pages_for_save();
    assert_eq!(pages[0].data.object_count(), Some(1));

    // After a round trip the guides are recreated on demand.
    editor.add_page().unwrap();
    editor.switch_to(0).unwrap();
    assert_eq!(editor.scene().objects().len(), 1);
    editor.handle_event(CanvasEvent::MouseDown { target: Some(id), x: 5.0, y: 5.0 });
    editor.handle_event(CanvasEvent::ObjectMoving { id });
    assert_eq!(editor.scene().objects().len(), 7);
}

#[test]
fn unreadable_document_keeps_the_open_one() {
    let mut editor = Editor::default();
    let id = editor.add_object(SceneObject::rect(0.0, 0.0, 10.0, 10.0));
    let broken = Page {
        name: "Imported".into(),
        data: SceneSnapshot::from_value(serde_json::json!({ "version": 99 })),
    };

    assert!(editor.load_document(vec![broken]).is_err());
    assert_eq!(editor.current_page(), Some(0));
    assert_eq!(editor.document().pages()[0].name, "Page 1");
    assert_eq!(editor.scene().content_ids(), vec![id]);
    assert!(editor.can_undo());
    assert_eq!(editor.take_notices().len(), 1);

    // Edits after the failed load still reach the saved pages.
    editor.add_object(SceneObject::circle(0.0, 0.0, 5.0));
    let pages = editor.pages_for_save();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].data.object_count(), Some(2));
}
