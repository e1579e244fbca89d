//! Benchmarks for the SO(3) transform pipeline
//!
//! Run with: cargo bench -p sofft-core --bench soft_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use sofft_core::prelude::*;
use sofft_core::quadrature::quadrature_weights;
use sofft_core::wigner::wigner_d_matrix;
use sofft_core::Matrix;

fn bench_quadrature(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadrature_weights");

    for bandwidth in [16usize, 64, 128] {
        group.throughput(Throughput::Elements(2 * bandwidth as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(bandwidth),
            &bandwidth,
            |b, &bw| {
                let mut w = vec![0.0; 2 * bw];
                b.iter(|| quadrature_weights(black_box(&mut w)).unwrap())
            },
        );
    }

    group.finish();
}

fn bench_wigner_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("wigner_d_matrix");

    for bandwidth in [16usize, 64, 128] {
        group.bench_with_input(
            BenchmarkId::new("orders_1_0", bandwidth),
            &bandwidth,
            |b, &bw| {
                let mut wig = Matrix::new(bw - 1, 2 * bw);
                b.iter(|| wigner_d_matrix(black_box(&mut wig), bw, 1, 0).unwrap())
            },
        );
    }

    group.finish();
}

fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsoft_forward");
    group.sample_size(10);

    for bandwidth in [8usize, 16, 32] {
        let mut fc = SoftCoefficients::new(bandwidth);
        fill_coefficients_seeded(&mut fc, -1.0, 1.0, Engine::Small, 0xBE7C).unwrap();
        let mut grid = Grid3::cube(2 * bandwidth);
        idsoft(&fc, &mut grid, 1).unwrap();

        group.throughput(Throughput::Elements((2 * bandwidth as u64).pow(3)));
        group.bench_with_input(
            BenchmarkId::new("serial", bandwidth),
            &bandwidth,
            |b, &bw| {
                b.iter(|| {
                    let mut out = SoftCoefficients::new(bw);
                    dsoft(black_box(grid.clone()), &mut out, 1).unwrap();
                    out
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("threaded", bandwidth),
            &bandwidth,
            |b, &bw| {
                let threads = max_threads();
                b.iter(|| {
                    let mut out = SoftCoefficients::new(bw);
                    dsoft(black_box(grid.clone()), &mut out, threads).unwrap();
                    out
                })
            },
        );
    }

    group.finish();
}

fn bench_inverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("idsoft_inverse");
    group.sample_size(10);

    for bandwidth in [8usize, 16, 32] {
        let mut fc = SoftCoefficients::new(bandwidth);
        fill_coefficients_seeded(&mut fc, -1.0, 1.0, Engine::Small, 0x1D50).unwrap();

        group.throughput(Throughput::Elements((2 * bandwidth as u64).pow(3)));
        group.bench_with_input(
            BenchmarkId::new("serial", bandwidth),
            &bandwidth,
            |b, &bw| {
                let mut grid = Grid3::cube(2 * bw);
                b.iter(|| idsoft(black_box(&fc), &mut grid, 1).unwrap())
            },
        );
        group.bench_with_input(
            BenchmarkId::new("threaded", bandwidth),
            &bandwidth,
            |b, &bw| {
                let threads = max_threads();
                let mut grid = Grid3::cube(2 * bw);
                b.iter(|| idsoft(black_box(&fc), &mut grid, threads).unwrap())
            },
        );
    }

    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip");
    group.sample_size(10);

    for bandwidth in [8usize, 16] {
        let mut fc = SoftCoefficients::new(bandwidth);
        fill_coefficients_seeded(&mut fc, -1.0, 1.0, Engine::Small, 0x0F0F).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(bandwidth),
            &bandwidth,
            |b, &bw| {
                b.iter(|| {
                    let mut grid = Grid3::cube(2 * bw);
                    idsoft(&fc, &mut grid, 1).unwrap();
                    let mut back = SoftCoefficients::new(bw);
                    dsoft(grid, &mut back, 1).unwrap();
                    back
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_quadrature,
    bench_wigner_matrix,
    bench_forward,
    bench_inverse,
    bench_round_trip
);
criterion_main!(benches);
