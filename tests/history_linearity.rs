use egui::Pos2;
use geosketch::element::{DrawingObject, ShapeKind};
use geosketch::error::HistoryError;
use geosketch::{EditorConfig, EditorError, EditorSession, GeoPoint};

fn session() -> EditorSession {
    EditorSession::open(GeoPoint::new(0.0, 0.0), EditorConfig::default()).unwrap()
}

fn objects(editor: &EditorSession) -> Vec<DrawingObject> {
    editor.document().objects().to_vec()
}

#[test]
fn test_undo_redo_walks_the_line() {
    let mut editor = session();
    editor.add_shape(ShapeKind::Rect, Pos2::new(10.0, 10.0)).unwrap();
    let after_e1 = objects(&editor);
    editor.add_shape(ShapeKind::Circle, Pos2::new(50.0, 50.0)).unwrap();
    let after_e2 = objects(&editor);
    editor.add_shape(ShapeKind::Triangle, Pos2::new(90.0, 90.0)).unwrap();

    editor.undo().unwrap();
    editor.undo().unwrap();
    assert_eq!(objects(&editor), after_e1);

    editor.redo().unwrap();
    assert_eq!(objects(&editor), after_e2);
}

#[test]
fn test_new_edit_discards_redo_branch() {
    let mut editor = session();
    editor.add_shape(ShapeKind::Rect, Pos2::new(10.0, 10.0)).unwrap();
    editor.add_shape(ShapeKind::Rect, Pos2::new(20.0, 20.0)).unwrap();
    editor.add_shape(ShapeKind::Rect, Pos2::new(30.0, 30.0)).unwrap();

    editor.undo().unwrap();
    editor.add_text("E4", Pos2::new(40.0, 40.0)).unwrap();
    let after_e4 = objects(&editor);

    assert!(matches!(
        editor.redo(),
        Err(EditorError::History(HistoryError::AtHistoryEnd))
    ));
    assert_eq!(objects(&editor), after_e4);
    assert_eq!(editor.document().len(), 3);
    assert!(
        editor
            .document()
            .objects()
            .iter()
            .all(|o| o.transform.position != Pos2::new(30.0, 30.0))
    );
}

#[test]
fn test_undo_at_start_keeps_content() {
    let mut editor = session();
    assert!(matches!(
        editor.undo(),
        Err(EditorError::History(HistoryError::AtHistoryStart))
    ));
    assert!(editor.document().is_empty());

    editor.add_shape(ShapeKind::Rect, Pos2::new(10.0, 10.0)).unwrap();
    editor.undo().unwrap();
    assert!(editor.document().is_empty());
    assert!(matches!(
        editor.undo(),
        Err(EditorError::History(HistoryError::AtHistoryStart))
    ));
}

#[test]
fn test_ids_not_reused_after_undo() {
    let mut editor = session();
    let first = editor.add_shape(ShapeKind::Rect, Pos2::new(0.0, 0.0)).unwrap();
    editor.undo().unwrap();
    let second = editor.add_shape(ShapeKind::Rect, Pos2::new(0.0, 0.0)).unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_layer_changes_are_undoable() {
    let mut editor = session();
    editor.add_layer("Ink").unwrap();
    editor.toggle_layer(0).unwrap();
    assert!(!editor.document().layers()[0].visible);

    editor.undo().unwrap();
    assert!(editor.document().layers()[0].visible);
    editor.undo().unwrap();
    assert_eq!(editor.document().layers().len(), 1);
}
