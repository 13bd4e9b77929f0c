//! Benchmarks for the hot geometry paths: pointer → cell mapping, track
//! lookup and keep-visible scrolling on large sheets.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridview::layout::{Axis, AxisStore, SheetLayout, Viewport};
use gridview::{CellRange, SelectionType};

fn sheet(rows: u32, cols: u32) -> SheetLayout {
    let mut rows = AxisStore::new(rows, 25.0, 25.0, 25.0);
    // Sprinkle hidden and resized rows so lookups can't take a fast path.
    for i in (0..rows.len()).step_by(7) {
        rows.set_hidden(i, true);
    }
    for i in (3..rows.len()).step_by(11) {
        rows.set_size(i, 60.0);
    }
    let cols = AxisStore::new(cols, 100.0, 60.0, 60.0);
    let mut layout = SheetLayout::new(rows, cols);
    layout.set_freeze(2, 1);
    layout
}

fn bench_index_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_at");
    for len in [1_000u32, 100_000, 1_000_000] {
        let layout = sheet(len, 26);
        let total = layout.rows().total();
        group.bench_with_input(BenchmarkId::from_parameter(len), &layout, |b, layout| {
            b.iter(|| layout.rows().index_at(black_box(total * 0.73)))
        });
    }
    group.finish();
}

fn bench_cell_at(c: &mut Criterion) {
    let layout = sheet(100_000, 200);
    let mut viewport = Viewport::new(1280.0, 800.0);
    viewport.set_scroll(Axis::Row, 400_000.0, &layout);
    viewport.set_scroll(Axis::Col, 5_000.0, &layout);

    c.bench_function("cell_at_scrolled", |b| {
        b.iter(|| layout.cell_at(black_box(640.0), black_box(400.0), &viewport))
    });
}

fn bench_ensure_visible(c: &mut Criterion) {
    let layout = sheet(100_000, 200);
    c.bench_function("ensure_visible_far_jump", |b| {
        b.iter(|| {
            let mut viewport = Viewport::new(1280.0, 800.0);
            let target = CellRange::single(black_box(90_000), black_box(150));
            viewport.ensure_visible(&target, SelectionType::CellRange, &layout)
        })
    });
}

criterion_group!(benches, bench_index_at, bench_cell_at, bench_ensure_visible);
criterion_main!(benches);
