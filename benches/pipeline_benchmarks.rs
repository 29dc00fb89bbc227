//! Pipeline stage benchmarks on synthetic timings
//!
//! Timings follow `c·n³` with multiplicative noise so the classifier does
//! real work on every language.
//!
//! Run with: cargo bench --bench pipeline_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use matbench::aggregate;
use matbench::complexity::{polyfit, ComplexityClassifier};
use matbench::metrics;
use matbench::record::{RawRecord, RecordStore};
use matbench::report::narrative;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZES: [u32; 6] = [64, 128, 256, 512, 1024, 2048];
const ITERATIONS: usize = 5;

fn synthetic_store(languages: usize) -> RecordStore {
    let mut rng = StdRng::seed_from_u64(42);
    let mut store = RecordStore::new();
    for lang in 0..languages {
        let scale = rng.gen_range(1e-10..1e-8);
        for &size in &SIZES {
            let base = scale * f64::from(size).powi(3);
            let times = (0..ITERATIONS)
                .map(|_| base * rng.gen_range(0.95..1.05))
                .collect();
            store.add_record(metrics::derive(RawRecord::new(
                format!("lang{lang}"),
                size,
                times,
            )));
        }
    }
    store
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for languages in [4, 16, 64] {
        let store = synthetic_store(languages);
        group.bench_with_input(BenchmarkId::from_parameter(languages), &store, |b, store| {
            b.iter(|| {
                let mut store = store.clone();
                aggregate::aggregate(black_box(&mut store))
            });
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let classifier = ComplexityClassifier::default();
    for languages in [4, 16, 64] {
        let store = synthetic_store(languages);
        group.bench_with_input(BenchmarkId::from_parameter(languages), &store, |b, store| {
            b.iter(|| classifier.classify(black_box(store)));
        });
    }
    group.finish();
}

fn bench_polyfit(c: &mut Criterion) {
    let mut group = c.benchmark_group("polyfit");
    let xs: Vec<f64> = SIZES.iter().map(|&n| f64::from(n)).collect();
    let ys: Vec<f64> = xs.iter().map(|x| 3e-9 * x.powi(3)).collect();
    for degree in 1..=3 {
        group.bench_with_input(BenchmarkId::from_parameter(degree), &degree, |b, &degree| {
            b.iter(|| polyfit::fit(black_box(&xs), black_box(&ys), degree));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut store = synthetic_store(16);
    let aggregation = aggregate::aggregate(&mut store);
    let classification = ComplexityClassifier::default().classify(&store);
    c.bench_function("render_report", |b| {
        b.iter(|| narrative::render(black_box(&aggregation), black_box(&classification)));
    });
}

criterion_group!(
    benches,
    bench_aggregate,
    bench_classify,
    bench_polyfit,
    bench_render
);
criterion_main!(benches);
