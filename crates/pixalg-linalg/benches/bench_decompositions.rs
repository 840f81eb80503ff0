use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pixalg_linalg::batch::{eigen_decompositions, ExecutionStrategy};
use pixalg_linalg::ops;
use pixalg_matrix::DenseMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> DenseMatrix<f64> {
    DenseMatrix::from_fn(rows, cols, |_, _| rng.random_range(-1.0..1.0)).unwrap()
}

fn bench_decompositions(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompositions");
    let mut rng = StdRng::seed_from_u64(42);

    for n in [8, 32, 64].iter() {
        let a = random_matrix(&mut rng, *n, *n);
        let spd = a.transpose().matmul(&a).unwrap();

        group.bench_with_input(BenchmarkId::new("lu", n), &a, |b, a| {
            b.iter(|| black_box(ops::lu_decomposition(a)))
        });

        group.bench_with_input(BenchmarkId::new("qr", n), &a, |b, a| {
            b.iter(|| black_box(ops::qr_decomposition(a).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("cholesky", n), &spd, |b, spd| {
            b.iter(|| black_box(ops::cholesky_decomposition(spd).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("eigen_symmetric", n), &spd, |b, spd| {
            b.iter(|| black_box(ops::eigen_decomposition(spd).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("eigen_general", n), &a, |b, a| {
            b.iter(|| black_box(ops::eigen_decomposition(a).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("svd", n), &a, |b, a| {
            b.iter(|| black_box(ops::svd(a).unwrap()))
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_eigen");
    let mut rng = StdRng::seed_from_u64(7);
    let matrices: Vec<_> = (0..256).map(|_| random_matrix(&mut rng, 6, 6)).collect();

    for (name, strategy) in [
        ("serial", ExecutionStrategy::Serial),
        ("parallel", ExecutionStrategy::Parallel),
    ] {
        group.bench_with_input(BenchmarkId::new(name, matrices.len()), &matrices, |b, m| {
            b.iter(|| black_box(eigen_decompositions(m, strategy).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decompositions, bench_batch);
criterion_main!(benches);
