//! Criterion micro-benchmarks for arena allocation, reset, and free.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use regio::Arena;
use regio_bench::{mixed_sizes, run_workload, small_objects};

/// Benchmark: 10K 32-byte allocations into a warm arena (reset between runs).
fn bench_alloc_small_warm(c: &mut Criterion) {
    let sizes = small_objects(10_000, 32);
    let mut arena = Arena::new(0);
    run_workload(&mut arena, &sizes).unwrap();

    c.bench_function("alloc_small_warm_10k", |b| {
        b.iter(|| {
            arena.reset();
            black_box(run_workload(&mut arena, &sizes).unwrap());
        });
    });
}

/// Benchmark: the same workload on a cold arena, paying for every region.
fn bench_alloc_small_cold(c: &mut Criterion) {
    let sizes = small_objects(10_000, 32);

    c.bench_function("alloc_small_cold_10k", |b| {
        b.iter(|| {
            let mut arena = Arena::new(0);
            black_box(run_workload(&mut arena, &sizes).unwrap());
        });
    });
}

/// Benchmark: mixed sizes that force tail walks and oversized regions.
fn bench_alloc_mixed_warm(c: &mut Criterion) {
    let sizes = mixed_sizes(10_000, 4096);
    let mut arena = Arena::new(4096);
    run_workload(&mut arena, &sizes).unwrap();

    c.bench_function("alloc_mixed_warm_10k", |b| {
        b.iter(|| {
            arena.reset();
            black_box(run_workload(&mut arena, &sizes).unwrap());
        });
    });
}

/// Benchmark: reset vs free + reallocate on a 64-region chain.
fn bench_reset_vs_free(c: &mut Criterion) {
    let sizes = small_objects(64, 8 * 1024);

    let mut arena = Arena::new(0);
    run_workload(&mut arena, &sizes).unwrap();
    c.bench_function("reset_64_regions", |b| {
        b.iter(|| {
            arena.reset();
            black_box(arena.region_count());
        });
    });

    c.bench_function("free_and_refill_64_regions", |b| {
        b.iter(|| {
            arena.free();
            black_box(run_workload(&mut arena, &sizes).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_alloc_small_warm,
    bench_alloc_small_cold,
    bench_alloc_mixed_warm,
    bench_reset_vs_free
);
criterion_main!(benches);
