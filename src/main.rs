//! Path-Planner-Editor (Demo-Host).
//!
//! Baut einen Beispielpfad über Commands auf, berechnet die Fahrknoten und
//! zeigt Undo/Redo. Ein grafischer Host nutzt dieselbe `EditorState`-API.

use path_planner_editor::app::commands::{AddPaths, DragControls, SegmentEdit};
use path_planner_editor::{Control, EditorOptions, EditorState, Path, SegmentVariant, Vector2};

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!(
        "Path-Planner-Editor v{} startet...",
        env!("CARGO_PKG_VERSION")
    );

    let options = EditorOptions::load_from_file(&EditorOptions::config_path());
    let mut state = EditorState::new(options);

    let path = Path::new(
        "Beispiel",
        Control::end(Vector2::new(0.0, 0.0), 0.0),
        Control::end(Vector2::new(60.0, 0.0), 0.0),
    );
    let path_uid = path.uid.clone();
    state.execute("Pfad hinzufügen", AddPaths::new(vec![path], None));
    state.execute(
        "Segment anhängen",
        SegmentEdit::append(&path_uid, SegmentVariant::Cubic, Vector2::new(120.0, 60.0), 90.0),
    );

    let end = state
        .document
        .path(&path_uid)
        .and_then(|p| p.last_control())
        .map(|c| c.uid.clone())
        .ok_or_else(|| anyhow::anyhow!("Beispielpfad ohne Endpunkt"))?;
    for _ in 0..5 {
        state.execute(
            "Verschieben",
            DragControls::new(&path_uid, &end, Vec::new(), Vector2::new(2.0, 1.0)),
        );
    }

    report(&mut state, &path_uid);
    state.undo();
    log::info!("Nach Undo:");
    report(&mut state, &path_uid);
    state.redo();
    log::info!("Nach Redo: geändert = {}", state.is_modified());

    let clipboard = state.copy_selected()?;
    log::info!("Zwischenablage: {} Bytes", clipboard.len());
    Ok(())
}

fn report(state: &mut EditorState, path_uid: &str) {
    let Some(knots) = state.knots(path_uid) else {
        log::warn!("Pfad {} nicht gefunden", path_uid);
        return;
    };
    let length = knots.last().map_or(0.0, |k| k.integral);
    let top_speed = knots.iter().map(|k| k.speed).fold(0.0, f64::max);
    log::info!(
        "{} Knoten, Länge {:.3}, Höchstgeschwindigkeit {:.1}",
        knots.len(),
        length,
        top_speed
    );
}
