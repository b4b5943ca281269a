//! Benchmarks for statistics extraction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tsstat::detection::{acf, SeasonalityAcf};
use tsstat::extract::ExtractStats;
use tsstat::validation::{kpss_test, nsdiffs, SeasonalTest};

fn generate_seasonal(n: usize, period: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            50.0 + 0.1 * i as f64
                + 5.0 * (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin()
                + ((i * 7919) % 13) as f64 * 0.05
        })
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_statistics");
    let extractor = ExtractStats::default();

    for size in [120, 240, 480, 960].iter() {
        let series = generate_seasonal(*size, 12);

        group.bench_with_input(BenchmarkId::new("default", size), size, |b, _| {
            b.iter(|| extractor.extract_statistics(black_box(&series)))
        });
    }

    group.finish();
}

fn bench_components(c: &mut Criterion) {
    let mut group = c.benchmark_group("components");

    for size in [240, 960].iter() {
        let series = generate_seasonal(*size, 12);
        let nlags = (size - 1) / 2;

        group.bench_with_input(BenchmarkId::new("acf", size), size, |b, _| {
            b.iter(|| acf(black_box(&series), nlags))
        });

        group.bench_with_input(BenchmarkId::new("seasonality_acf", size), size, |b, _| {
            let estimator = SeasonalityAcf::new(nlags);
            b.iter(|| estimator.fit(black_box(&series)))
        });

        group.bench_with_input(BenchmarkId::new("kpss", size), size, |b, _| {
            b.iter(|| kpss_test(black_box(&series), None))
        });

        group.bench_with_input(BenchmarkId::new("ocsb_nsdiffs", size), size, |b, _| {
            b.iter(|| nsdiffs(black_box(&series), 12, 2, SeasonalTest::Ocsb))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract, bench_components);
criterion_main!(benches);
