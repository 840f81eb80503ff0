use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pixalg_fft::{fft2d, fft2x, ifft2d};
use pixalg_matrix::DenseMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> DenseMatrix<f32> {
    DenseMatrix::from_fn(rows, cols, |_, _| rng.random_range(0.0..255.0)).unwrap()
}

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft2d");
    let mut rng = StdRng::seed_from_u64(42);

    // power of two sizes take the radix-2 path, the others go through Bluestein
    for (rows, cols) in [(256, 256), (240, 320), (512, 512)].iter() {
        let a = random_matrix(&mut rng, *rows, *cols);
        let b = random_matrix(&mut rng, *rows, *cols);
        let id = format!("{}x{}", rows, cols);

        group.bench_with_input(BenchmarkId::new("fft2d", &id), &a, |bench, a| {
            bench.iter(|| black_box(fft2d(a).unwrap()))
        });

        let spectrum = fft2d(&a).unwrap();
        group.bench_with_input(BenchmarkId::new("ifft2d", &id), &spectrum, |bench, s| {
            bench.iter(|| black_box(ifft2d(s).unwrap()))
        });

        group.bench_with_input(
            BenchmarkId::new("fft2d_twice", &id),
            &(&a, &b),
            |bench, (a, b)| bench.iter(|| black_box((fft2d(*a).unwrap(), fft2d(*b).unwrap()))),
        );

        group.bench_with_input(
            BenchmarkId::new("fft2x", &id),
            &(&a, &b),
            |bench, (a, b)| bench.iter(|| black_box(fft2x(*a, *b).unwrap())),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_fft);
criterion_main!(benches);
