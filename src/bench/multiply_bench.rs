//! Direct vs blocked vs Strassen at a few power-of-two sizes.
//!
//! The benchmark binary (`cargo run --release`) does the full sweep with
//! memory sampling; this harness is for quick A/B comparisons while
//! tuning the blocked tile size and the Strassen cutoff.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use strassen::{blocked_multiply, direct_multiply, recursive_multiply};

const THREADS: usize = 4;
const BLOCK_SIZE: usize = 32;
const THRESHOLD: usize = 64;

fn digits(n: usize, step: i64) -> Vec<i64> {
    (0..(n * n) as i64).map(|i| (i * step) % 10).collect()
}

fn bench_multipliers(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply");

    for &n in &[64usize, 128, 256] {
        let a = digits(n, 1);
        let b = digits(n, 7);

        group.bench_function(BenchmarkId::new("direct", n), |bencher| {
            let mut out = vec![0i64; n * n];
            bencher.iter(|| {
                direct_multiply(black_box(&a), black_box(&b), &mut out, n, THREADS).unwrap();
            })
        });

        group.bench_function(BenchmarkId::new("blocked", n), |bencher| {
            let mut out = vec![0i64; n * n];
            bencher.iter(|| {
                out.fill(0);
                blocked_multiply(black_box(&a), black_box(&b), &mut out, n, BLOCK_SIZE, THREADS)
                    .unwrap();
            })
        });

        group.bench_function(BenchmarkId::new("strassen", n), |bencher| {
            let mut out = vec![0i64; n * n];
            bencher.iter(|| {
                recursive_multiply(black_box(&a), black_box(&b), &mut out, n, THRESHOLD, THREADS)
                    .unwrap();
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_multipliers);
criterion_main!(benches);
