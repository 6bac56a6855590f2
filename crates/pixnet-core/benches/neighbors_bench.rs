//! # Neighbor Benchmarks
//!
//! Performance benchmarks for the neighbor finder and full network build.
//!
//! Run with: `cargo bench -p pixnet-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pixnet_core::{DefaultAssetLayout, Dataset, ExportOptions, Point, build_network, find_neighbors};
use std::hint::black_box;

/// Deterministic scatter of `size` points on a spiral.
fn create_spiral(size: usize) -> Vec<Point> {
    (0..size)
        .map(|i| {
            let t = i as f64 * 0.1;
            Point::xy(t * t.cos(), t * t.sin())
        })
        .collect()
}

fn create_dataset(size: usize) -> Dataset {
    let names = (0..size).map(|i| format!("img_{i}.jpg")).collect();
    Dataset::new(names, create_spiral(size))
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_find_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_neighbors");

    for size in [100, 1000, 4000].iter() {
        let points = create_spiral(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &points, |b, points| {
            b.iter(|| black_box(find_neighbors(points, 10)));
        });
    }

    group.finish();
}

fn bench_build_network(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_network");
    let options = ExportOptions {
        neighbors: 10,
        include_thumbs: true,
        include_metadata: false,
    };
    let resolver = DefaultAssetLayout::new("/data");

    for size in [100, 1000].iter() {
        let dataset = create_dataset(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| black_box(build_network(dataset, &options, &resolver)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_find_neighbors, bench_build_network);
criterion_main!(benches);
