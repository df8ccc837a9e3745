//! Measurement overhead benchmarks

use criterion::{BenchmarkId, Criterion};
use gatherx::{measure, measure_spawned, try_measure};

pub fn bench_measure(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("measure");

    for count in [4usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("join", count), &count, |b, &count| {
            b.to_async(&rt).iter(|| measure(|| async {}, count));
        });

        group.bench_with_input(BenchmarkId::new("try_join", count), &count, |b, &count| {
            b.to_async(&rt)
                .iter(|| try_measure(|| async { Ok::<_, ()>(1u32) }, count));
        });

        group.bench_with_input(BenchmarkId::new("spawned", count), &count, |b, &count| {
            b.to_async(&rt).iter(|| {
                measure_spawned(
                    |fut| {
                        tokio::spawn(fut);
                    },
                    || async { Ok::<_, ()>(1u32) },
                    count,
                )
            });
        });
    }

    group.finish();
}
