//! Sine and cosine over slices: scalar `std`, the SIMD slice kernels on the native
//! backend, and their rayon versions.
//!
//! Sizes walk the cache hierarchy from L1-resident to memory-bound inputs.

use std::hint::black_box;
use std::time::Instant;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdvec::prelude::*;

// ================================================================================================
// BENCHMARK CONFIGURATION
// ================================================================================================

/// f32 = 4 bytes, so 1M elements = 4 MiB.
const VECTOR_SIZES: &[usize] = &[
    1_024,     // 4 KiB - L1 cache
    16_384,    // 64 KiB - L1→L2 transition
    262_144,   // 1 MiB - L2 cache, parallel threshold
    1_048_576, // 4 MiB - L2→L3 transition
    4_194_304, // 16 MiB - L3 cache
];

fn generate_test_data(len: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len)
        .map(|_| rng.random::<f32>() * 2.0 * std::f32::consts::PI)
        .collect()
}

fn scalar_sin(input: &[f32]) -> Vec<f32> {
    input.iter().map(|x| x.sin()).collect()
}

fn scalar_cos(input: &[f32]) -> Vec<f32> {
    input.iter().map(|x| x.cos()).collect()
}

// ================================================================================================
// BENCHMARK IMPLEMENTATIONS
// ================================================================================================

fn benchmark_sine(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("Sine_{}", format_size(size)));
        group.throughput(Throughput::Bytes((size * std::mem::size_of::<f32>()) as u64));

        let input_vec = generate_test_data(size);
        let input_slice = input_vec.as_slice();

        group.bench_with_input(BenchmarkId::new("scalar", size), input_slice, |b, input| {
            b.iter(|| black_box(scalar_sin(black_box(input))))
        });
        group.bench_with_input(BenchmarkId::new("simd", size), input_slice, |b, input| {
            b.iter(|| black_box(black_box(input).simd_sin()))
        });
        group.bench_with_input(
            BenchmarkId::new("parallel SIMD", size),
            input_slice,
            |b, input| b.iter(|| black_box(black_box(input).par_simd_sin())),
        );

        group.finish();
    }
}

fn benchmark_cosine(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("Cosine_{}", format_size(size)));
        group.throughput(Throughput::Bytes((size * std::mem::size_of::<f32>()) as u64));

        let input_vec = generate_test_data(size);
        let input_slice = input_vec.as_slice();

        group.bench_with_input(BenchmarkId::new("scalar", size), input_slice, |b, input| {
            b.iter(|| black_box(scalar_cos(black_box(input))))
        });
        group.bench_with_input(BenchmarkId::new("simd", size), input_slice, |b, input| {
            b.iter(|| black_box(black_box(input).simd_cos()))
        });
        group.bench_with_input(
            BenchmarkId::new("parallel SIMD", size),
            input_slice,
            |b, input| b.iter(|| black_box(black_box(input).par_simd_cos())),
        );

        group.finish();
    }
}

/// One 16-lane register's worth, `sincos` against two separate calls.
fn benchmark_sincos_vector(c: &mut Criterion) {
    let mut group = c.benchmark_group("SinCos_vector");
    let v = Vector::<f32, 16>::from_array(std::array::from_fn(|i| i as f32 * 0.37 - 3.0));
    let e = v.to_backend::<Emulation>();

    group.bench_function("native sincos", |b| b.iter(|| black_box(black_box(v).sincos())));
    group.bench_function("native sin + cos", |b| {
        b.iter(|| {
            let v = black_box(v);
            black_box((v.sin(), v.cos()))
        })
    });
    group.bench_function("emulation sincos", |b| b.iter(|| black_box(black_box(e).sincos())));

    group.finish();
}

// ================================================================================================
// UTILITY FUNCTIONS
// ================================================================================================

fn format_size(elements: usize) -> String {
    let bytes = elements * std::mem::size_of::<f32>();

    if bytes >= 1_048_576 {
        format!("{:.1}_MiB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1}_KiB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes}_B")
    }
}

fn all_benchmarks(c: &mut Criterion) {
    println!("Starting sine/cosine benchmarks on the {} backend", simdvec::BACKEND);
    let start_time = Instant::now();

    benchmark_sine(c);
    benchmark_cosine(c);
    benchmark_sincos_vector(c);

    println!(
        "Benchmark suite completed in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
}

// ================================================================================================
// CRITERION INTEGRATION
// ================================================================================================

criterion_group!(benches, all_benchmarks);
criterion_main!(benches);
