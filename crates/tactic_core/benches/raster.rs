//! Rasterizer benchmarks for tactic_core.
//!
//! Run with: `cargo bench -p tactic_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tactic_core::raster::{disk_offsets, line, DiskOffsetCache};

/// Runs rasterizer benchmarks for the tactic_core crate.
pub fn raster_benchmark(c: &mut Criterion) {
    c.bench_function("disk_offsets_cold", |b| {
        b.iter_with_setup(DiskOffsetCache::new, |cache| {
            black_box(cache.get(black_box(5.5)));
        });
    });

    c.bench_function("disk_offsets_warm", |b| {
        // Warm the process-wide cache once, then measure lookups.
        disk_offsets(5.5);
        b.iter(|| black_box(disk_offsets(black_box(5.5))));
    });

    c.bench_function("line_200_cells", |b| {
        b.iter(|| black_box(line(0, 0, black_box(199), black_box(87))));
    });
}

criterion_group!(benches, raster_benchmark);
criterion_main!(benches);
