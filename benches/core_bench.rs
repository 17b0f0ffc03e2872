use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use path_planner_editor::app::commands::{DragControls, SegmentEdit};
use path_planner_editor::{
    Command, Control, Document, EditHistory, GeneralConfig, Path, SegmentVariant, SpeedConfig,
    Vector2,
};
use std::hint::black_box;
use std::time::Duration;

/// Dokument mit einem Zickzack-Pfad aus abwechselnd Geraden und Kurven.
fn build_synthetic_document(segment_count: usize) -> (Document, String) {
    let path = Path::new(
        "Bench",
        Control::end(Vector2::new(0.0, 0.0), 0.0),
        Control::end(Vector2::new(50.0, 20.0), 0.0),
    );
    let uid = path.uid.clone();
    let mut doc = Document::new();
    doc.push_path(path);

    for index in 1..segment_count {
        let x = 50.0 * (index + 1) as f64;
        let y = if index % 2 == 0 { 20.0 } else { -20.0 };
        let variant = if index % 3 == 0 {
            SegmentVariant::Linear
        } else {
            SegmentVariant::Cubic
        };
        Command::new(SegmentEdit::append(&uid, variant, Vector2::new(x, y), 0.0))
            .execute(&mut doc);
    }
    (doc, uid)
}

fn bench_calculate_knots(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate_knots");
    let general = GeneralConfig::default();
    let speed = SpeedConfig::default();

    for &segment_count in &[4usize, 32usize] {
        let (doc, uid) = build_synthetic_document(segment_count);
        let Some(path) = doc.path(&uid) else {
            continue;
        };
        group.bench_with_input(
            BenchmarkId::new("uncached", segment_count),
            path,
            |b, path| b.iter(|| black_box(path.calculate_knots(&general, &speed).len())),
        );
    }

    let (mut doc, uid) = build_synthetic_document(32);
    if let Some(cached) = doc.path_mut(&uid) {
        cached.knots(&general, &speed);
        group.bench_function("cached_32", |b| {
            b.iter(|| black_box(cached.knots(&general, &speed).len()))
        });
    }

    group.finish();
}

fn bench_drag_merge(c: &mut Criterion) {
    c.bench_function("drag_merge_100_moves", |b| {
        b.iter(|| {
            let (mut doc, path_uid) = build_synthetic_document(8);
            let Some(control) = doc
                .path(&path_uid)
                .map(|p| p.segments()[3].last().to_string())
            else {
                return 0;
            };
            let mut history = EditHistory::new_with_capacity(200);

            for _ in 0..100 {
                let drag = DragControls::new(&path_uid, &control, Vec::new(), Vector2::new(0.1, 0.0));
                history.execute_command(
                    &mut doc,
                    "Verschieben",
                    Command::new(drag),
                    Duration::from_secs(60),
                );
            }
            black_box(history.undo_len())
        })
    });
}

criterion_group!(benches, bench_calculate_knots, bench_drag_merge);
criterion_main!(benches);
