//! Benchmarks comparing cursor iteration against random access through
//! chains of views.
//!
//! Run with:
//! ```bash
//! cargo bench --bench views
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lazytensor::shape::{increment_indices};
use lazytensor::{Tensor, View};
use std::hint::black_box;

/// Sum a view by walking its cursor.
fn sum_iter<V: View<T = f64>>(v: &V) -> f64 {
    v.iter().sum()
}

/// Sum a view by calling `at()` on every multi-index.
fn sum_at<V: View<T = f64>>(v: &V) -> f64 {
    let mut index = vec![0; v.order()];
    let mut total = 0.0;
    for _ in 0..v.len() {
        total += v.at(&index);
        increment_indices(v.shape(), &mut index);
    }
    total
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");

    for shape in [vec![1000, 1000], vec![100, 100, 100], vec![30, 30, 30, 30]] {
        let tensor = Tensor::full(&shape, 1.0).unwrap();
        let name = format!("{:?}", shape);
        group.throughput(Throughput::Elements(tensor.len() as u64));
        let view = (&tensor).transpose(0, -1).unwrap();

        group.bench_with_input(BenchmarkId::new("iter", &name), &view, |b, view| {
            b.iter(|| black_box(sum_iter(view)));
        });
        group.bench_with_input(BenchmarkId::new("at", &name), &view, |b, view| {
            b.iter(|| black_box(sum_at(view)));
        });
    }

    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");

    let a = Tensor::full(&[64, 64, 64], 1.0).unwrap();
    let bias = Tensor::full(&[64, 1], 0.5).unwrap();
    let view = ((&a).t().unwrap().t().unwrap() + &bias)
        .pad(&[64, 80, 64], 0.0)
        .unwrap()
        .sum_axis(1)
        .unwrap();
    group.throughput(Throughput::Elements(a.len() as u64));

    group.bench_function("iter", |b| b.iter(|| black_box(sum_iter(&view))));
    group.bench_function("at", |b| b.iter(|| black_box(sum_at(&view))));
    group.bench_function("collect", |b| b.iter(|| black_box(view.collect())));

    group.finish();
}

fn bench_matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");

    for size in [16usize, 64, 128] {
        let a = Tensor::full(&[size, size], 1.0f64).unwrap();
        let b = Tensor::full(&[size, size], 2.0f64).unwrap();
        group.throughput(Throughput::Elements((size * size * size) as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &(&a, &b), |bench, (a, b)| {
            bench.iter(|| black_box(a.matmul(black_box(*b)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transpose, bench_chain, bench_matmul);
criterion_main!(benches);
