//! Fixture generator benchmarks.
//!
//! Generation runs outside the timed database operations, but it still
//! gates how fast the matrix iterates at the 20K size.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use league_bench::fixtures::{generate_seeded, DEFAULT_BASE_YEAR, DEFAULT_PAYLOAD_KIB};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixtures/generate");
    for count in [100usize, 2000, 20000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| generate_seeded(count, DEFAULT_BASE_YEAR, DEFAULT_PAYLOAD_KIB, 42));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
