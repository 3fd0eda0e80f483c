//! Persistence payload integration tests

use std::rc::Rc;
use std::time::Instant;

use mapsketch_annotate::{
    DrawSettings, DrawTool, EditorEvent, PlanarEngine, SketchEditor, SketchPhase, SketchPayload,
    Viewport, PAYLOAD_VERSION,
};
use mapsketch_core::geometry::{Extent, Geometry, Point, Polygon, Polyline, ScreenPoint};

fn editor() -> SketchEditor {
    SketchEditor::new(
        Rc::new(PlanarEngine::new()),
        Rc::new(Viewport::new(800.0, 600.0)),
    )
}

fn draw_shape(editor: &mut SketchEditor, tool: DrawTool, geometry: Geometry, now: Instant) {
    let mut settings = DrawSettings::default();
    settings.tool = tool;
    editor.update_settings(settings, now);
    editor.begin_draw();
    editor.handle_event(
        EditorEvent::Sketch {
            phase: SketchPhase::Complete,
            geometry: Some(geometry),
        },
        now,
    );
}

fn populated_editor() -> SketchEditor {
    let now = Instant::now();
    let mut editor = editor();
    draw_shape(
        &mut editor,
        DrawTool::Polyline,
        Geometry::Polyline(Polyline::single(vec![
            Point::new(0.0, 0.0),
            Point::new(30.0, 40.0),
        ])),
        now,
    );
    draw_shape(
        &mut editor,
        DrawTool::Polygon,
        Geometry::Polygon(Polygon::rectangle(Extent::new(10.0, 10.0, 60.0, 60.0))),
        now,
    );
    editor.place_text("landmark");
    editor.handle_event(
        EditorEvent::ViewClick {
            position: ScreenPoint::new(400.0, 300.0),
        },
        now,
    );
    editor
}

#[test]
fn test_export_import_round_trip() {
    let source = populated_editor();
    let payload = source.export_payload();
    assert_eq!(payload.version, PAYLOAD_VERSION);

    let mut restored = editor();
    restored.import_payload(payload).unwrap();

    assert_eq!(restored.draw_layer().len(), source.draw_layer().len());
    assert_eq!(restored.label_layer().len(), source.label_layer().len());
    assert_eq!(restored.text_layer().len(), source.text_layer().len());

    let original: Vec<_> = source
        .draw_layer()
        .iter()
        .map(|(_, g)| g.geometry.clone())
        .collect();
    let roundtripped: Vec<_> = restored
        .draw_layer()
        .iter()
        .map(|(_, g)| g.geometry.clone())
        .collect();
    assert_eq!(original, roundtripped);

    // Label attribution survives the round trip.
    assert_eq!(restored.label_index().len(), source.label_index().len());
}

#[test]
fn test_round_trip_through_json_text() {
    let source = populated_editor();
    let json = serde_json::to_string(&source.export_payload()).unwrap();
    let payload: SketchPayload = serde_json::from_str(&json).unwrap();

    let mut restored = editor();
    restored.import_payload(payload).unwrap();
    assert_eq!(restored.draw_layer().len(), 2);
    assert_eq!(restored.text_layer().len(), 1);
}

#[test]
fn test_legacy_payload_imports_with_empty_text() {
    let mut payload = populated_editor().export_payload();
    payload.version = 1;
    payload.text.clear();

    let mut restored = editor();
    restored.import_payload(payload).unwrap();
    assert_eq!(restored.draw_layer().len(), 2);
    assert!(restored.text_layer().is_empty());
}

#[test]
fn test_unsupported_version_fails_without_partial_import() {
    let mut target = populated_editor();
    let shapes_before = target.draw_layer().len();

    let mut payload = SketchPayload::new();
    payload.version = PAYLOAD_VERSION + 1;
    let err = target.import_payload(payload).unwrap_err();
    assert!(err.is_version_mismatch());

    // Nothing was cleared or imported.
    assert_eq!(target.draw_layer().len(), shapes_before);
}

#[test]
fn test_new_ids_never_collide_with_imported_ones() {
    let source = populated_editor();
    let payload = source.export_payload();

    let mut restored = editor();
    restored.import_payload(payload).unwrap();
    let mut existing: Vec<_> = restored
        .draw_layer()
        .iter()
        .chain(restored.text_layer().iter())
        .filter_map(|(_, g)| g.assigned_id())
        .collect();

    let now = Instant::now();
    draw_shape(
        &mut restored,
        DrawTool::Point,
        Geometry::Point(Point::new(1.0, 1.0)),
        now,
    );
    let new_id = restored
        .draw_layer()
        .iter()
        .last()
        .unwrap()
        .1
        .assigned_id()
        .unwrap();
    existing.sort_unstable();
    assert!(!existing.contains(&new_id));
}

#[test]
fn test_file_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sketch.json");

    let source = populated_editor();
    source.save_to_file(&path).unwrap();

    let mut restored = editor();
    restored.load_from_file(&path).unwrap();
    assert_eq!(restored.draw_layer().len(), 2);
    assert_eq!(restored.text_layer().len(), 1);
    assert_eq!(restored.label_layer().len(), source.label_layer().len());
}

#[test]
fn test_load_missing_file_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let mut target = editor();
    assert!(target
        .load_from_file(dir.path().join("does-not-exist.json"))
        .is_err());
}
