use std::io::Cursor;

use egui::{Color32, Pos2};
use geosketch::config::{MAX_ZOOM, MIN_ZOOM};
use geosketch::element::{BrushType, DEFAULT_TEXT, Fill, MAX_FONT_SIZE, ObjectKind, ObjectPatch, ShapeKind};
use geosketch::error::ModelError;
use geosketch::{EditorConfig, EditorError, EditorSession, Filter, GeoPoint, PointerEvent, Tool};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

fn session() -> EditorSession {
    let _ = env_logger::builder().is_test(true).try_init();
    EditorSession::open(GeoPoint::new(12.34, -56.78), EditorConfig::default()).unwrap()
}

fn drag(editor: &mut EditorSession, points: &[Pos2]) {
    let (first, rest) = points.split_first().unwrap();
    editor.handle_pointer(PointerEvent::down(*first)).unwrap();
    for p in rest {
        editor.handle_pointer(PointerEvent::moved(*p)).unwrap();
    }
    editor.handle_pointer(PointerEvent::up(*points.last().unwrap())).unwrap();
}

fn red_square(editor: &mut EditorSession) {
    editor.set_fill(Fill::Solid(Color32::RED));
    editor.add_shape(ShapeKind::Rect, Pos2::new(50.0, 50.0)).unwrap();
}

#[test]
fn test_zoom_is_clamped() {
    let mut editor = session();
    for _ in 0..50 {
        editor.zoom_in();
    }
    assert_eq!(editor.zoom(), MAX_ZOOM);
    for _ in 0..50 {
        editor.zoom_out();
    }
    assert_eq!(editor.zoom(), MIN_ZOOM);
    assert_eq!(editor.set_zoom(7.0), MAX_ZOOM);
}

#[test]
fn test_export_ignores_view() {
    let mut editor = session();
    red_square(&mut editor);
    let before = editor.export_raster().unwrap();

    editor.set_zoom(2.5);
    editor.pan_by(egui::vec2(40.0, -12.0));
    let after = editor.export_raster().unwrap();

    assert_eq!(before.dimensions(), (512, 512));
    assert_eq!(before, after);
}

#[test]
fn test_export_is_deterministic() {
    let mut editor = session();
    red_square(&mut editor);
    editor.set_brush_type(BrushType::Spray);
    editor.select_tool(Tool::Brush).unwrap();
    drag(&mut editor, &[Pos2::new(10.0, 10.0), Pos2::new(200.0, 80.0)]);
    editor.add_text("Outpost", Pos2::new(100.0, 300.0)).unwrap();

    assert_eq!(editor.export_raster().unwrap(), editor.export_raster().unwrap());
}

#[test]
fn test_spray_stays_within_brush_radius() {
    let mut editor = session();
    editor.set_brush_type(BrushType::Spray);
    editor.set_brush_width(10.0);
    editor.set_spray_density(1.0);
    editor.select_tool(Tool::Brush).unwrap();

    let path = [Pos2::new(100.0, 100.0), Pos2::new(150.0, 100.0), Pos2::new(150.0, 140.0)];
    drag(&mut editor, &path);

    // One stroke object for the whole gesture
    assert_eq!(editor.document().len(), 1);
    let object = &editor.document().objects()[0];
    let ObjectKind::Stroke(stroke) = &object.kind else {
        panic!("expected a stroke");
    };
    assert_eq!(stroke.brush, BrushType::Spray);
    assert!(stroke.points.len() >= 90);

    let (min, max) = (Pos2::new(95.0, 95.0), Pos2::new(155.0, 145.0));
    for local in &stroke.points {
        let p = object.transform.apply(*local);
        assert!(p.x >= min.x - 1e-3 && p.x <= max.x + 1e-3, "{p:?} outside");
        assert!(p.y >= min.y - 1e-3 && p.y <= max.y + 1e-3, "{p:?} outside");
    }
}

#[test]
fn test_brush_changes_apply_to_next_stroke_only() {
    let mut editor = session();
    editor.select_tool(Tool::Brush).unwrap();
    editor.pointer_down(Pos2::new(10.0, 10.0)).unwrap();
    editor.set_brush_color(Color32::BLUE);
    editor.pointer_move(Pos2::new(40.0, 10.0)).unwrap();
    let first = editor.pointer_up(Pos2::new(40.0, 10.0)).unwrap().unwrap();

    drag(&mut editor, &[Pos2::new(10.0, 50.0), Pos2::new(40.0, 50.0)]);

    let doc = editor.document();
    assert_eq!(doc.object(first).unwrap().style.stroke, Color32::BLACK);
    assert_eq!(doc.objects()[1].style.stroke, Color32::BLUE);
}

#[test]
fn test_eraser_paints_background() {
    let mut editor = session();
    editor.select_tool(Tool::Brush).unwrap();
    editor.set_brush_width(10.0);
    drag(&mut editor, &[Pos2::new(20.0, 50.0), Pos2::new(120.0, 50.0)]);
    assert_eq!(editor.export_raster().unwrap().get_pixel(70, 50), &Rgba([0, 0, 0, 255]));

    editor.select_tool(Tool::Eraser).unwrap();
    editor.set_brush_width(30.0);
    drag(&mut editor, &[Pos2::new(20.0, 50.0), Pos2::new(120.0, 50.0)]);
    assert_eq!(editor.export_raster().unwrap().get_pixel(70, 50), &Rgba([255, 255, 255, 255]));
}

#[test]
fn test_filters_are_idempotent() {
    let mut editor = session();
    red_square(&mut editor);
    let plain = editor.export_raster().unwrap();

    editor.apply_filters(vec![Filter::Grayscale]).unwrap();
    let once = editor.export_raster().unwrap();
    editor.apply_filters(vec![Filter::Grayscale]).unwrap();
    let twice = editor.export_raster().unwrap();

    assert_ne!(plain, once);
    assert_eq!(once, twice);
}

#[test]
fn test_filters_need_selection() {
    let mut editor = session();
    red_square(&mut editor);
    editor.select_at(Pos2::new(500.0, 500.0));
    let before = editor.document().objects().to_vec();

    let err = editor.apply_filters(vec![Filter::Sepia]).unwrap_err();
    assert!(matches!(err, EditorError::Model(ModelError::NoActiveSelection)));
    assert_eq!(editor.document().objects(), before.as_slice());
}

#[test]
fn test_hidden_layer_not_exported() {
    let mut editor = session();
    let blank = editor.export_raster().unwrap();
    editor.add_layer("Overlay").unwrap();
    red_square(&mut editor);
    editor.set_layer_visible(1, false).unwrap();
    assert_eq!(editor.export_raster().unwrap(), blank);
}

#[test]
fn test_image_bytes_are_decoded_and_placed() {
    let mut editor = session();
    let mut png = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])))
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();

    editor.add_image_bytes(&png, Pos2::new(5.0, 5.0)).unwrap();
    let exported = editor.export_raster().unwrap();
    let Rgba([r, g, b, _]) = *exported.get_pixel(9, 9);
    assert!(r > 200 && g < 50 && b < 50);

    let err = editor.add_image_bytes(b"not an image", Pos2::ZERO).unwrap_err();
    assert!(matches!(err, EditorError::Codec(_)));
}

#[test]
fn test_text_patches() {
    let mut editor = session();
    editor.add_text("Hello", Pos2::new(10.0, 10.0)).unwrap();
    let patch = ObjectPatch {
        content: Some("Hello, world".into()),
        bold: Some(true),
        ..Default::default()
    };
    editor.update_active(&patch).unwrap();
    let text = editor.document().active_object().unwrap().as_text().unwrap();
    assert_eq!(text.content, "Hello, world");
    assert!(text.style.bold);

    editor.add_shape(ShapeKind::Triangle, Pos2::new(200.0, 200.0)).unwrap();
    let err = editor.update_active(&patch).unwrap_err();
    assert!(matches!(err, EditorError::Model(ModelError::NotText(_))));
}

#[test]
fn test_huge_font_size_is_clamped_and_exportable() {
    let mut editor = session();
    editor.add_text("Landmark", Pos2::new(10.0, 10.0)).unwrap();
    let patch = ObjectPatch {
        font_size: Some(40_000.0),
        ..Default::default()
    };
    editor.update_active(&patch).unwrap();
    let text = editor.document().active_object().unwrap().as_text().unwrap();
    assert_eq!(text.style.font_size, MAX_FONT_SIZE);

    let first = editor.export_raster().unwrap();
    assert_eq!(first.dimensions(), (512, 512));
    assert!(first.pixels().any(|p| p.0 == [0, 0, 0, 255]));
    assert_eq!(first, editor.export_raster().unwrap());
}

#[test]
fn test_large_text_off_canvas_exports() {
    let mut editor = session();
    editor.add_text(&"Outpost ".repeat(100), Pos2::new(-20_000.0, 200.0)).unwrap();
    editor
        .update_active(&ObjectPatch {
            font_size: Some(MAX_FONT_SIZE),
            ..Default::default()
        })
        .unwrap();
    assert!(editor.export_raster().is_ok());
}

#[test]
fn test_pattern_stroke_is_striped() {
    let mut editor = session();
    editor.set_brush_type(BrushType::Pattern);
    editor.set_brush_width(20.0);
    editor.select_tool(Tool::Brush).unwrap();
    drag(&mut editor, &[Pos2::new(50.0, 100.0), Pos2::new(150.0, 100.0), Pos2::new(250.0, 100.0)]);

    let object = &editor.document().objects()[0];
    let ObjectKind::Stroke(stroke) = &object.kind else {
        panic!("expected a stroke");
    };
    assert_eq!(stroke.brush, BrushType::Pattern);

    let image = editor.export_raster().unwrap();
    let row: Vec<[u8; 4]> = (60..240).map(|x| image.get_pixel(x, 100).0).collect();
    let ink = row.iter().filter(|p| **p == [0, 0, 0, 255]).count();
    let paper = row.iter().filter(|p| **p == [255, 255, 255, 255]).count();
    assert!(ink > 0, "no brush-colored pixels along the stroke");
    assert!(paper > 0, "pattern stroke painted solid");
    assert_eq!(ink + paper, row.len());
}

#[test]
fn test_text_tool_click_places_text() {
    let mut editor = session();
    editor.select_tool(Tool::Text).unwrap();
    let snapshots = editor.history().len();

    let id = editor.pointer_down(Pos2::new(120.0, 80.0)).unwrap().unwrap();
    assert_eq!(editor.pointer_up(Pos2::new(120.0, 80.0)).unwrap(), None);

    assert_eq!(editor.document().len(), 1);
    let object = editor.document().object(id).unwrap();
    assert_eq!(object.as_text().unwrap().content, DEFAULT_TEXT);
    assert_eq!(object.transform.position, Pos2::new(120.0, 80.0));
    assert_eq!(editor.history().len(), snapshots + 1);
}

#[test]
fn test_clear_then_undo_restores() {
    let mut editor = session();
    red_square(&mut editor);
    editor.add_text("Keep", Pos2::new(10.0, 10.0)).unwrap();
    editor.clear().unwrap();
    assert!(editor.document().is_empty());
    editor.undo().unwrap();
    assert_eq!(editor.document().len(), 2);
}
