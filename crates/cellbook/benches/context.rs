//! Benchmarks for context derivation
//!
//! Run with: cargo bench --package cellbook

use cellbook::{AppRegistry, CellLocator, Sheet, SheetOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

fn build_sheet(cells: usize, memoize_contexts: bool) -> (Sheet, Vec<CellLocator>) {
    let options = SheetOptions {
        memoize_contexts,
        ..Default::default()
    };
    let mut sheet = Sheet::with_options(AppRegistry::new(), options);
    let locators = (0..cells)
        .map(|i| sheet.insert_cell_with(i, "note", json!(format!("statement {i}"))))
        .collect();
    (sheet, locators)
}

/// Read every context after editing a cell in the middle
fn bench_edit_then_read_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("Edit then read all contexts");

    for &cells in &[16, 64, 256] {
        for memoize in [true, false] {
            let (mut sheet, locators) = build_sheet(cells, memoize);
            let middle = locators[cells / 2];
            let label = if memoize { "memoized" } else { "scratch" };
            let mut round = 0u64;

            group.bench_with_input(BenchmarkId::new(label, cells), &locators, |b, locators| {
                b.iter(|| {
                    round += 1;
                    sheet.replace_payload(middle, json!(format!("edit {round}")));
                    for &locator in locators {
                        black_box(sheet.context(locator).unwrap());
                    }
                });
            });
        }
    }

    group.finish();
}

/// Repeatedly read the last cell's context with no edits in between
fn bench_repeated_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("Repeated read of last context");

    for memoize in [true, false] {
        let (mut sheet, locators) = build_sheet(256, memoize);
        let last = locators[locators.len() - 1];
        let label = if memoize { "memoized" } else { "scratch" };

        group.bench_function(label, |b| {
            b.iter(|| black_box(sheet.context(last).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_edit_then_read_all, bench_repeated_read);
criterion_main!(benches);
