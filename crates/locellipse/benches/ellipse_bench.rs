//! Criterion benchmarks for error-ellipse derivation and queries.
//! Focus: initialization (axes + validity test) and perimeter sampling sizes
//! n in {12, 100, 1000}.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use locellipse::conic::rand::{draw_coefficients, SampleCfg};
use locellipse::{Ellipse, Location};
use rand::{rngs::StdRng, SeedableRng};

fn random_coefficients(count: usize, seed: u64) -> Vec<[f64; 4]> {
    let mut rng = StdRng::seed_from_u64(seed);
    let cfg = SampleCfg::default();
    (0..count)
        .map(|_| draw_coefficients(&mut rng, &cfg).expect("default cfg is valid"))
        .collect()
}

fn bench_initialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("ellipse_initialize");
    group.bench_function("with_coefficients_x1000", |b| {
        b.iter_batched(
            || random_coefficients(1000, 43),
            |coeffs| {
                for coeff in coeffs {
                    let e = Ellipse::with_coefficients(Location::default(), coeff);
                    black_box(e.area());
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_boundary(c: &mut Criterion) {
    let mut group = c.benchmark_group("ellipse_boundary");
    let coeff = random_coefficients(1, 44)[0];
    let e = Ellipse::with_coefficients(Location::default(), coeff);
    for &n in &[12usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("boundary_points", n), &n, |b, &n| {
            b.iter(|| black_box(e.boundary_points(n).expect("valid ellipse")))
        });
    }
    group.bench_function("distance_to_perimeter_azimuth", |b| {
        let mut az = 0.0f64;
        b.iter(|| {
            az += 0.01;
            black_box(e.distance_to_perimeter_azimuth(az).expect("finite azimuth"))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_initialize, bench_boundary);
criterion_main!(benches);
