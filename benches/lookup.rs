//! Benchmarks for spark-lookup
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spark_lookup::{LookupOptions, ObservableLookup, ToLookup};

fn filled(keys: u32, reuse: bool) -> ObservableLookup<u32, u32> {
    let mut lookup = ObservableLookup::with_options(LookupOptions::new().reuse_groups(reuse));
    for k in 0..keys {
        lookup.add(k, k);
    }
    lookup
}

// =============================================================================
// ADD BENCHMARKS
// =============================================================================

fn bench_add_existing_key(c: &mut Criterion) {
    let mut lookup = filled(1_000, false);
    c.bench_function("add_existing_key", |b| {
        b.iter(|| lookup.add(black_box(500), black_box(1)))
    });
}

fn bench_add_remove_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_remove_key");

    for reuse in [false, true] {
        group.bench_with_input(BenchmarkId::new("reuse", reuse), &reuse, |b, &reuse| {
            let mut lookup = filled(1_000, reuse);
            b.iter(|| {
                lookup.remove(black_box(&500));
                lookup.add(black_box(500), black_box(1));
            })
        });
    }

    group.finish();
}

fn bench_add_with_subscriber(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_with_subscriber");

    for keys in [10u32, 100, 1_000] {
        group.bench_with_input(BenchmarkId::new("keys", keys), &keys, |b, &keys| {
            let mut lookup = filled(keys, true);
            lookup.subscribe(|change| {
                black_box(change.position());
            });
            b.iter(|| {
                lookup.remove(&0);
                lookup.add(0, 0);
            })
        });
    }

    group.finish();
}

// =============================================================================
// ACCESS BENCHMARKS
// =============================================================================

fn bench_lookup_by_key(c: &mut Criterion) {
    let lookup = filled(1_000, false);
    c.bench_function("lookup_by_key", |b| {
        b.iter(|| black_box(lookup.get(black_box(&777)).map(|g| g.len())))
    });
}

fn bench_position_of(c: &mut Criterion) {
    let mut group = c.benchmark_group("position_of");

    for keys in [10u32, 100, 1_000] {
        let lookup = filled(keys, false);
        group.bench_with_input(BenchmarkId::new("keys", keys), &keys, |b, _| {
            b.iter(|| black_box(lookup.position_of(black_box(&0))))
        });
    }

    group.finish();
}

fn bench_to_lookup(c: &mut Criterion) {
    let source: Vec<u32> = (0..10_000).collect();
    c.bench_function("to_lookup_10k_by_mod_64", |b| {
        b.iter(|| black_box(source.iter().copied().to_lookup(|n| n % 64)))
    });
}

criterion_group!(
    add_benches,
    bench_add_existing_key,
    bench_add_remove_key,
    bench_add_with_subscriber,
);

criterion_group!(
    access_benches,
    bench_lookup_by_key,
    bench_position_of,
    bench_to_lookup,
);

criterion_main!(add_benches, access_benches);
