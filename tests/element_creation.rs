use egui::{Color32, Pos2};
use geosketch::element::{self, BrushType, ObjectKind, ObjectPatch, Shape, ShapeKind, Style};
use geosketch::error::ModelError;
use geosketch::{Document, ObjectId};

fn rect_draft() -> element::ObjectDraft {
    element::factory::shape(Shape::default_of(ShapeKind::Rect), Pos2::new(0.0, 0.0), Style::default())
}

#[test]
fn test_stroke_factory() {
    let draft = element::factory::stroke(
        vec![Pos2::new(10.0, 10.0), Pos2::new(20.0, 20.0)],
        BrushType::Pencil,
        Color32::RED,
        2.0,
    );

    // Points are stored relative to the transform position
    assert_eq!(draft.transform.position, Pos2::new(10.0, 10.0));
    let ObjectKind::Stroke(stroke) = &draft.kind else {
        panic!("expected a stroke");
    };
    assert_eq!(stroke.points, vec![Pos2::new(0.0, 0.0), Pos2::new(10.0, 10.0)]);
    assert_eq!(draft.style.stroke, Color32::RED);
}

#[test]
fn test_ids_are_sequential_and_selected() {
    let mut doc = Document::new();
    let first = doc.add_object(rect_draft());
    let second = doc.add_object(rect_draft());

    assert_eq!(first, ObjectId(1));
    assert_eq!(second, ObjectId(2));
    assert_eq!(doc.active_object_id(), Some(second));
    assert_eq!(doc.z_index(first), Some(0));
    assert_eq!(doc.z_index(second), Some(1));
}

#[test]
fn test_objects_join_active_layer() {
    let mut doc = Document::new();
    let base = doc.add_object(rect_draft());
    let sketch = doc.add_layer("Sketch");
    let top = doc.add_object(rect_draft());

    assert_eq!(doc.object(base).unwrap().layer, doc.layers()[0].id);
    assert_eq!(doc.object(top).unwrap().layer, doc.layers()[sketch].id);
}

#[test]
fn test_update_and_remove() {
    let mut doc = Document::new();
    let id = doc.add_object(rect_draft());

    let patch = ObjectPatch {
        position: Some(Pos2::new(50.0, 60.0)),
        stroke_color: Some(Color32::GREEN),
        ..Default::default()
    };
    doc.update_object(id, &patch).unwrap();
    let object = doc.object(id).unwrap();
    assert_eq!(object.transform.position, Pos2::new(50.0, 60.0));
    assert_eq!(object.style.stroke, Color32::GREEN);

    doc.remove_object(id).unwrap();
    assert!(doc.is_empty());
    assert!(doc.active_object().is_none());
    assert!(matches!(doc.remove_object(id), Err(ModelError::UnknownObject(_))));
}

#[test]
fn test_serialize_round_trip() {
    let mut doc = Document::new();
    doc.add_object(rect_draft());
    doc.add_object(element::factory::image(image::RgbaImage::new(3, 2), Pos2::new(4.0, 4.0)));
    doc.add_layer("Hidden");
    doc.set_layer_visible(1, false).unwrap();

    let json = doc.serialize().unwrap();
    let mut restored = Document::new();
    restored.deserialize(&json).unwrap();

    assert_eq!(restored.objects(), doc.objects());
    assert_eq!(restored.layers(), doc.layers());
    assert_eq!(restored.active_layer_index(), 1);
}
