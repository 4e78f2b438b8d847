//! Performance benchmarks for index building and queries
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skulookup::index::{build_index, RawRow, RawTable, RawValue};
use skulookup::query::{lookup_batch, lookup_one, search_descriptions};

const SHAPES: [&str; 5] = ["Round", "Hex", "Square", "Oblong", "Rectangle"];
const TOOLS: [&str; 2] = ["punch", "die"];

/// Synthetic catalog: `sheets` sheets of `rows` rows, numeric SKUs
fn create_catalog(sheets: usize, rows: usize) -> Vec<RawTable> {
    (0..sheets)
        .map(|sheet| {
            let rows = (0..rows)
                .map(|i| {
                    let sku = (sheet * rows + i) as f64;
                    let description = format!(
                        "{} {} {}/{}",
                        SHAPES[i % SHAPES.len()],
                        TOOLS[i % TOOLS.len()],
                        i % 16 + 1,
                        16
                    );
                    RawRow::new(vec![RawValue::Float(sku), RawValue::Text(description)])
                })
                .collect();

            RawTable::new(
                format!("Sheet{}", sheet + 1),
                vec!["SKU".to_string(), "Description".to_string()],
            )
            .with_rows(rows)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_index");

    for rows in [1_000, 10_000, 50_000] {
        let catalog = create_catalog(4, rows / 4);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &catalog, |b, catalog| {
            b.iter(|| build_index(black_box(catalog)).unwrap())
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let built = build_index(&create_catalog(4, 12_500)).unwrap();

    c.bench_function("lookup_one", |b| {
        b.iter(|| lookup_one(&built.index, black_box(" 31337 ")))
    });

    let batch: Vec<String> = (0..1_000).map(|i| (i * 37).to_string()).collect();
    c.bench_function("lookup_batch_1000", |b| {
        b.iter(|| lookup_batch(&built.index, black_box(&batch)))
    });

    let mut group = c.benchmark_group("search_descriptions");
    for term in ["hex", "1/2", "rectangle die", "nothing"] {
        group.bench_with_input(BenchmarkId::from_parameter(term), &term, |b, term| {
            b.iter(|| search_descriptions(&built.corpus, black_box(term)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_queries);
criterion_main!(benches);
