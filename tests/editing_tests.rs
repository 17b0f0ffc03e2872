//! Integrationstests für Pfad-Engine und Undo/Redo:
//! - Kurvenauswertung und Resampling
//! - Teilen/Entfernen von Segmenten, Grenzknoten
//! - Merge-Fenster, Redo-Verwerfung, Speichermarke
//! - Keyframe- und Drag-Szenarien

use approx::assert_relative_eq;
use path_planner_editor::app::commands::{
    AddKeyframe, AddPaths, DragControls, MoveKeyframe, SegmentEdit,
};
use path_planner_editor::{
    Command, Control, Document, EditHistory, EditorOptions, EditorState, GeneralConfig, Keyframe,
    Path, SegmentVariant, SelectionState, SpeedConfig, Vector2,
};
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_millis(500);

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Editor mit einem Pfad A(0,0) → B(10,0).
fn editor_with_line() -> (EditorState, String) {
    init_logger();
    let mut state = EditorState::new(EditorOptions::default());
    let path = Path::new(
        "A-B",
        Control::end(Vector2::new(0.0, 0.0), 0.0),
        Control::end(Vector2::new(10.0, 0.0), 0.0),
    );
    let uid = path.uid.clone();
    assert!(state.execute("Pfad hinzufügen", AddPaths::new(vec![path], None)));
    state.history.commit();
    (state, uid)
}

fn path<'a>(state: &'a EditorState, uid: &str) -> &'a Path {
    state.document.path(uid).expect("Pfad vorhanden")
}

fn position(state: &EditorState, path_uid: &str, control: &str) -> Vector2 {
    path(state, path_uid).control(control).expect("Kontrollpunkt").position
}

// ── Geometrie ──

#[test]
fn test_curve_endpoints_match_controls() {
    let (mut state, uid) = editor_with_line();
    state.execute(
        "Kurve",
        SegmentEdit::append(&uid, SegmentVariant::Cubic, Vector2::new(17.123, -4.456), 0.0),
    );
    let p = path(&state, &uid);
    for segment in p.segments() {
        let curve = segment.curve(p.controls()).expect("auflösbar");
        let first = p.control(segment.first()).unwrap().position;
        let last = p.control(segment.last()).unwrap().position;
        assert_eq!(curve.evaluate_at(0.0), first);
        assert_eq!(curve.evaluate_at(1.0), last);
    }
}

#[test]
fn test_resample_deltas_reproduce_arc_length() {
    let (mut state, uid) = editor_with_line();
    state.execute(
        "Kurve",
        SegmentEdit::append(&uid, SegmentVariant::Cubic, Vector2::new(20.0, 10.0), 0.0),
    );
    let p = path(&state, &uid);
    let curve = p.segments()[1].curve(p.controls()).unwrap();
    let interval = GeneralConfig::default().sample_interval();
    let sum: f64 = curve.resample(interval, 0.0).map(|k| k.delta).sum();
    assert_relative_eq!(sum, curve.total_arc_length(), max_relative = 0.01);
}

// ── Struktur-Szenarien ──

#[test]
fn test_split_then_remove_shared_endpoint() {
    let (mut state, uid) = editor_with_line();
    let original = path(&state, &uid).segments()[0].clone();

    assert!(state.execute(
        "Teilen",
        SegmentEdit::split(&uid, &original.uid, Vector2::new(6.0, 0.0))
    ));
    let p = path(&state, &uid);
    assert_eq!(p.segments().len(), 2);
    assert!(p
        .segments()
        .iter()
        .all(|s| s.variant() == SegmentVariant::Linear));
    let shared = p.segments()[0].last().to_string();
    assert_eq!(p.segments()[1].first(), shared);

    assert!(state.execute("Entfernen", SegmentEdit::remove(&uid, &shared)));
    let p = path(&state, &uid);
    assert_eq!(p.segments().len(), 1);
    assert_eq!(p.segments()[0].first(), original.first());
    assert_eq!(p.segments()[0].last(), original.last());
    assert!(p.is_continuous());

    // Beide Schritte zurück ergibt wieder das Original-Segment
    state.undo();
    state.undo();
    assert_eq!(path(&state, &uid).segments(), &[original]);
}

#[test]
fn test_boundary_knot_once_in_final_sequence() {
    let (mut state, uid) = editor_with_line();
    state.execute(
        "Gerade",
        SegmentEdit::append(&uid, SegmentVariant::Linear, Vector2::new(20.0, 0.0), 0.0),
    );
    let knots = state.knots(&uid).expect("Knoten").to_vec();
    let at_b = knots
        .iter()
        .filter(|k| k.position() == Vector2::new(10.0, 0.0))
        .count();
    assert_eq!(at_b, 1);
    assert_eq!(knots[0].position(), Vector2::new(0.0, 0.0));
    assert_eq!(knots[knots.len() - 1].position(), Vector2::new(20.0, 0.0));
    assert_eq!(knots[knots.len() - 1].speed, 0.0);
}

#[test]
fn test_knots_follow_undo() {
    let (mut state, uid) = editor_with_line();
    let before = state.knots(&uid).unwrap().to_vec();
    state.execute(
        "Gerade",
        SegmentEdit::append(&uid, SegmentVariant::Linear, Vector2::new(20.0, 0.0), 0.0),
    );
    assert_ne!(state.knots(&uid).unwrap(), before.as_slice());
    state.undo();
    assert_eq!(state.knots(&uid).unwrap(), before.as_slice());

    let speed = SpeedConfig::default();
    let fresh = path(&state, &uid).calculate_knots(&GeneralConfig::default(), &speed);
    assert_eq!(fresh, before);
}

// ── History-Gesetze ──

#[test]
fn test_execute_clears_redo_stack() {
    let (mut state, uid) = editor_with_line();
    let end = path(&state, &uid).segments()[0].last().to_string();
    state.execute(
        "Gerade",
        SegmentEdit::append(&uid, SegmentVariant::Linear, Vector2::new(20.0, 0.0), 0.0),
    );
    assert!(state.undo());
    assert!(state.history.can_redo());

    state.execute(
        "Verschieben",
        DragControls::new(&uid, &end, Vec::new(), Vector2::new(0.0, 1.0)),
    );
    assert!(!state.history.can_redo());
    assert!(!state.redo());
}

#[test]
fn test_execute_without_effect_still_clears_redo_stack() {
    let (mut state, uid) = editor_with_line();
    let line = path(&state, &uid).segments()[0].uid.clone();
    state.execute(
        "Gerade",
        SegmentEdit::append(&uid, SegmentVariant::Linear, Vector2::new(20.0, 0.0), 0.0),
    );
    assert!(state.undo());
    assert!(state.history.can_redo());

    // Gerade → Gerade ändert nichts und wird nicht aufgezeichnet
    let undo_before = state.history.undo_len();
    assert!(!state.execute(
        "Umwandeln",
        SegmentEdit::convert(&uid, &line, SegmentVariant::Linear)
    ));
    assert_eq!(state.history.undo_len(), undo_before);
    assert!(!state.history.can_redo());
    assert!(!state.redo());
    assert_eq!(path(&state, &uid).segments().len(), 1);
}

#[test]
fn test_save_marks_unmodified_until_next_execute() {
    let (mut state, uid) = editor_with_line();
    let end = path(&state, &uid).segments()[0].last().to_string();
    state.save();
    assert!(!state.is_modified());

    state.execute(
        "Verschieben",
        DragControls::new(&uid, &end, Vec::new(), Vector2::new(1.0, 0.0)),
    );
    assert!(state.is_modified());

    // Undo zurück zur Marke, Redo wieder davon weg
    state.undo();
    assert!(!state.is_modified());
    state.redo();
    assert!(state.is_modified());
}

#[test]
fn test_modified_check_misreports_after_clear_on_empty_save() {
    let (mut state, uid) = editor_with_line();
    state.history.clear();
    state.save();
    let end = path(&state, &uid).segments()[0].last().to_string();
    state.execute(
        "Verschieben",
        DragControls::new(&uid, &end, Vec::new(), Vector2::new(1.0, 0.0)),
    );
    assert!(state.is_modified());

    // Bekannte Einschränkung: leerer Stack gleicht der leeren Marke,
    // obwohl das Dokument vom gespeicherten Stand abweicht.
    state.history.clear();
    assert!(!state.is_modified());
}

#[test]
fn test_modified_check_uses_identity_not_content() {
    let (mut state, uid) = editor_with_line();
    let end = path(&state, &uid).segments()[0].last().to_string();
    let drag = || DragControls::new(&uid, &end, Vec::new(), Vector2::new(1.0, 0.0));

    state.execute("Verschieben", drag());
    state.save();
    state.undo();
    state.execute("Verschieben", drag());
    // Gleicher Inhalt, aber neuer Eintrag
    assert_eq!(position(&state, &uid, &end), Vector2::new(11.0, 0.0));
    assert!(state.is_modified());
}

// ── Merge-Szenarien ──

#[test]
fn test_drag_twice_within_window_is_one_undo_step() {
    init_logger();
    let mut doc = Document::new();
    let line = Path::new(
        "L",
        Control::end(Vector2::new(0.0, 0.0), 0.0),
        Control::end(Vector2::new(10.0, 0.0), 0.0),
    );
    let uid = line.uid.clone();
    let control = line.segments()[0].last().to_string();
    doc.push_path(line);

    let mut history = EditHistory::new_with_capacity(50);
    let mut selection = SelectionState::new();
    let t0 = Instant::now();
    let d = Vector2::new(1.25, -0.5);
    let d2 = Vector2::new(0.333, 2.0);

    history.execute_command_at(
        &mut doc,
        "Verschieben",
        Command::new(DragControls::new(&uid, &control, Vec::new(), d)),
        WINDOW,
        t0,
    );
    history.execute_command_at(
        &mut doc,
        "Verschieben",
        Command::new(DragControls::new(&uid, &control, Vec::new(), d2)),
        WINDOW,
        t0 + Duration::from_millis(120),
    );
    assert_eq!(history.undo_len(), 1);
    assert_eq!(
        doc.path(&uid).unwrap().control(&control).unwrap().position,
        Vector2::new(10.0, 0.0).add(d).add(d2)
    );

    assert!(history.undo(&mut doc, &mut selection));
    assert_eq!(
        doc.path(&uid).unwrap().control(&control).unwrap().position,
        Vector2::new(10.0, 0.0)
    );
    assert!(!history.can_undo());
    assert!(selection.contains(&control));
}

#[test]
fn test_drags_with_different_followers_do_not_merge() {
    let (mut state, uid) = editor_with_line();
    let p = path(&state, &uid);
    let start = p.segments()[0].first().to_string();
    let end = p.segments()[0].last().to_string();
    let undo_before = state.history.undo_len();

    state.execute(
        "Verschieben",
        DragControls::new(&uid, &end, Vec::new(), Vector2::new(1.0, 0.0)),
    );
    state.execute(
        "Verschieben",
        DragControls::new(&uid, &end, vec![start], Vector2::new(1.0, 0.0)),
    );
    assert_eq!(state.history.undo_len(), undo_before + 2);
}

// ── Keyframes ──

#[test]
fn test_keyframe_move_to_other_segment_then_undo() {
    let (mut state, uid) = editor_with_line();
    state.execute(
        "Gerade",
        SegmentEdit::append(&uid, SegmentVariant::Linear, Vector2::new(20.0, 0.0), 0.0),
    );
    let p = path(&state, &uid);
    let first = p.segments()[0].uid.clone();
    let second = p.segments()[1].uid.clone();

    let keyframe = Keyframe::new(0.25, 0.75);
    let keyframe_uid = keyframe.uid.clone();
    assert!(state.execute("Keyframe", AddKeyframe::new(&uid, &first, keyframe)));
    assert!(state.execute(
        "Keyframe verschieben",
        MoveKeyframe::new(&uid, &keyframe_uid, &second, 0.6, 0.1)
    ));
    let p = path(&state, &uid);
    assert!(p.segment(&first).unwrap().keyframe(&keyframe_uid).is_none());
    assert!(p.segment(&second).unwrap().keyframe(&keyframe_uid).is_some());

    assert!(state.undo());
    let p = path(&state, &uid);
    let restored = p
        .segment(&first)
        .unwrap()
        .keyframe(&keyframe_uid)
        .expect("zurück im Ursprungssegment");
    assert_eq!((restored.x_pos, restored.y_pos), (0.25, 0.75));
    assert!(p.segment(&second).unwrap().keyframes().is_empty());
}

#[test]
fn test_paste_from_clipboard_is_undoable() {
    let (mut state, uid) = editor_with_line();
    state.selection.replace([uid.clone()]);
    let text = state.copy_selected().expect("kodierbar");

    assert!(state.paste(&text));
    assert_eq!(state.document.len(), 2);
    assert!(!state.paste("{\"fremd\": true}"));
    assert_eq!(state.document.len(), 2);

    assert!(state.undo());
    assert_eq!(state.document.len(), 1);
}

#[test]
fn test_keyframe_moves_within_window_merge_into_one_step() {
    let (mut state, uid) = editor_with_line();
    state.execute(
        "Gerade",
        SegmentEdit::append(&uid, SegmentVariant::Linear, Vector2::new(20.0, 0.0), 0.0),
    );
    let p = path(&state, &uid);
    let first = p.segments()[0].uid.clone();
    let second = p.segments()[1].uid.clone();

    let keyframe = Keyframe::new(0.25, 0.5);
    let keyframe_uid = keyframe.uid.clone();
    state.execute("Keyframe", AddKeyframe::new(&uid, &first, keyframe));
    state.history.commit();
    let undo_before = state.history.undo_len();

    let mut selection = SelectionState::new();
    let t0 = Instant::now();
    state.history.execute_command_at(
        &mut state.document,
        "Keyframe verschieben",
        Command::new(MoveKeyframe::new(&uid, &keyframe_uid, &second, 0.4, 0.4)),
        WINDOW,
        t0,
    );
    state.history.execute_command_at(
        &mut state.document,
        "Keyframe verschieben",
        Command::new(MoveKeyframe::new(&uid, &keyframe_uid, &second, 0.8, 0.3)),
        WINDOW,
        t0 + Duration::from_millis(80),
    );
    assert_eq!(state.history.undo_len(), undo_before + 1);

    assert!(state.history.undo(&mut state.document, &mut selection));
    let p = path(&state, &uid);
    let restored = p
        .segment(&first)
        .unwrap()
        .keyframe(&keyframe_uid)
        .expect("zurück im Ursprungssegment");
    assert_eq!((restored.x_pos, restored.y_pos), (0.25, 0.5));
    assert!(p.segment(&second).unwrap().keyframes().is_empty());

    assert!(state.history.redo(&mut state.document, &mut selection));
    let p = path(&state, &uid);
    assert!(p.segment(&first).unwrap().keyframes().is_empty());
    let moved = p.segment(&second).unwrap().keyframe(&keyframe_uid).unwrap();
    assert_eq!((moved.x_pos, moved.y_pos), (0.8, 0.3));
}
