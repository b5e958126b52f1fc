use core::hint::black_box;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use sortbench::{Batch, sort_concurrent, sort_sequential};
use tokio::runtime::Builder;

/// (arrays per batch, elements per array)
const SHAPES: &[(usize, usize)] = &[(8, 65_536), (64, 4_096), (1_024, 256), (4_096, 16)];

fn make_batch(arrays: usize, len: usize) -> Batch {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    (0..arrays)
        .map(|_| (0..len).map(|_| rng.random::<i64>()).collect())
        .collect()
}

/// Compares both strategies on batches of equal total size but different
/// fan-out widths.
fn bench_strategies(c: &mut Criterion) {
    let rt = Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    let mut group = c.benchmark_group("sort");

    for &(arrays, len) in SHAPES {
        let batch = make_batch(arrays, len);
        let label = format!("{arrays}x{len}");
        group.throughput(Throughput::Elements((arrays * len) as u64));

        group.bench_with_input(BenchmarkId::new("sequential", &label), &batch, |b, batch| {
            b.iter(|| black_box(sort_sequential(black_box(batch))));
        });

        group.bench_with_input(BenchmarkId::new("concurrent", &label), &batch, |b, batch| {
            b.to_async(&rt).iter(|| async {
                black_box(
                    sort_concurrent(black_box(batch))
                        .await
                        .expect("concurrent sort failed"),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
