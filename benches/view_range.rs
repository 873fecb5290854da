//! Benchmarks for view range computation and frame painting.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sheetview::data::DataService;
use sheetview::engine::{DisplayPatch, PatchBatch, QueueClient, ValueEntry};
use sheetview::layout::{ScrollPos, ViewRangeBuilder};
use sheetview::render::{RecordingCanvas, SheetRenderer};
use sheetview::types::{CellPatch, CellValue, RowInfo};
use sheetview::{Session, Settings};

/// 10^8 rows with every millionth row resized.
fn tall_sheet(settings: &Settings) -> DataService {
    let mut data = DataService::new(settings);
    for row in (0..settings.max_rows).step_by(1_000_000) {
        data.set_row_info(
            row,
            RowInfo {
                idx: row,
                height: 30.0,
                hidden: false,
            },
            None,
        );
    }
    data
}

/// Build the view range at increasing scroll depths.
fn bench_build(c: &mut Criterion) {
    let settings = Settings::default();
    let data = tall_sheet(&settings);
    let sheet = data.sheet_data(None).expect("active sheet");
    let builder = ViewRangeBuilder::new(sheet, &settings);
    let mut group = c.benchmark_group("view_range_build");
    for depth in [0.0, 1.0e6, 1.0e9] {
        group.bench_with_input(BenchmarkId::from_parameter(depth as u64), &depth, |b, &y| {
            b.iter(|| builder.build(black_box(1600.0), black_box(900.0), ScrollPos::new(0.0, y)))
        });
    }
    group.finish();
}

/// Paint one full frame of a filled viewport into a recording canvas.
fn bench_render(c: &mut Criterion) {
    let settings = Settings::default();
    let mut session = Session::new(settings.clone(), Box::new(QueueClient::new()));
    session.resize_viewport(1600.0, 900.0);
    let mut batch = PatchBatch {
        incremental: true,
        patches: Vec::new(),
    };
    let values = (0..50)
        .flat_map(|row| (0..30).map(move |col| (row, col)))
        .map(|(row, col)| ValueEntry {
            row,
            col,
            formula: None,
            value: Some(CellValue::Number(f64::from(row * 30 + col))),
        })
        .collect();
    batch.patches.push(DisplayPatch::Values {
        sheet_idx: 0,
        values,
    });
    session.apply_batch(batch);

    let mut renderer = SheetRenderer::new(&settings);
    let mut canvas = RecordingCanvas::new(1600.0, 900.0);
    c.bench_function("render_frame", |b| {
        b.iter(|| {
            canvas.take_ops();
            renderer
                .render(&mut canvas, black_box(&session))
                .expect("render")
        })
    });
}

/// Cell lookups against a sparse cache.
fn bench_cell_lookup(c: &mut Criterion) {
    let mut data = DataService::default();
    for i in 0..10_000 {
        data.set_cell(
            i * 997,
            i % 50,
            None,
            CellPatch {
                value: Some(CellValue::Number(f64::from(i))),
                ..CellPatch::default()
            },
        );
    }
    c.bench_function("cell_lookup", |b| {
        b.iter(|| data.get_cell(black_box(4_985_000), black_box(0), None))
    });
}

criterion_group!(benches, bench_build, bench_render, bench_cell_lookup);
criterion_main!(benches);
