//! Criterion microbenches for the hot paths of the search.
//!
//! - total error of one grid,
//! - one hill climb from a random start,
//! - combination and symmetry-pair scoring of an exact solution.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use magic::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

const SOLVED: Grid = [13, 7, 2, 11, 3, 5, 10, 15, 9, 4, 14, 6, 8, 17, 7, 1];

fn bench_error(c: &mut Criterion) {
    let geo = Geometry::new(GeometryCfg::default().with_subset_sizes(2..=2)).unwrap();
    let mut group = c.benchmark_group("deviation");
    group.bench_function(BenchmarkId::new("total_error", "standard"), |b| {
        b.iter(|| total_error(&geo, &REFERENCE_GRID))
    });
    group.finish();
}

fn bench_climb(c: &mut Criterion) {
    let geo = Geometry::new(GeometryCfg::default().with_subset_sizes(2..=2)).unwrap();
    let cfg = ClimbCfg::default();
    let mut group = c.benchmark_group("climb");
    group.bench_function(BenchmarkId::new("climb_from_random", "1-30/1-17"), |b| {
        b.iter_batched(
            || SmallRng::seed_from_u64(42),
            |mut rng| climb_from_random(&geo, &cfg, &mut rng),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_score(c: &mut Criterion) {
    let geo = Geometry::new(GeometryCfg::default()).unwrap();
    let mut group = c.benchmark_group("score");
    group.bench_function(BenchmarkId::new("combination_count", "2-16"), |b| {
        b.iter(|| combination_count(&geo, &SOLVED))
    });
    group.bench_function(BenchmarkId::new("symmetry_pair_count", "2-16"), |b| {
        b.iter(|| symmetry_pair_count(&geo, &SOLVED))
    });
    group.finish();
}

criterion_group!(benches, bench_error, bench_climb, bench_score);
criterion_main!(benches);
