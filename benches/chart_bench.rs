//! Benchmarks for chart builders and the regression
//!
//! Run with: cargo bench

use county_atlas::charts::{build_map, build_scatter, MapOptions};
use county_atlas::data::{CountyTable, Dataset, DatasetMeta, GeoBoundary, TableLayout};
use county_atlas::stats::{quantile_range, OlsFit};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn fips(i: usize) -> String {
    format!("{:05}", 1001 + i * 2)
}

fn create_dataset(name: &str, count: usize, scale: f64) -> Dataset {
    let mut csv = format!("FIPS,PlaceName,{}\n", name);
    for i in 0..count {
        let value = scale * (1.0 + (i as f64 * 0.37).sin().abs()) + i as f64 % 7.0;
        csv.push_str(&format!("{},County {},{}\n", fips(i), i, value));
    }
    let table = CountyTable::from_reader(csv.as_bytes(), name, &TableLayout::default()).unwrap();
    Dataset::new(DatasetMeta::new(name), table).unwrap()
}

fn create_boundary(count: usize) -> GeoBoundary {
    let features: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"type":"Feature","id":"{}","properties":{{}},"geometry":null}}"#,
                fips(i)
            )
        })
        .collect();
    let text = format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    );
    GeoBoundary::from_geojson_str(&text, "bench").unwrap()
}

fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");

    for size in [100, 1000, 3000] {
        let x: Vec<f64> = (0..size).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + (v * 0.5).sin()).collect();

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("quantile_range_{}", size), |b| {
            b.iter(|| quantile_range(black_box(&y), 0.01).unwrap())
        });

        group.bench_function(format!("ols_fit_{}", size), |b| {
            b.iter(|| OlsFit::fit(black_box(&x), black_box(&y)).unwrap())
        });
    }

    group.finish();
}

fn bench_charts(c: &mut Criterion) {
    let mut group = c.benchmark_group("charts");

    // Roughly the number of US counties
    let size = 3200;
    let spending = create_dataset("spending", size, 10000.0);
    let outcome = create_dataset("outcome", size, 20.0);
    let boundary = create_boundary(size);
    let options = MapOptions::default();

    group.throughput(Throughput::Elements(size as u64));

    group.bench_function("build_map", |b| {
        b.iter(|| build_map(black_box(&spending), "spending", &options, &boundary).unwrap())
    });

    group.bench_function("build_scatter", |b| {
        b.iter(|| {
            build_scatter(black_box(&spending), &outcome, "spending", "outcome", false).unwrap()
        })
    });

    group.bench_function("build_scatter_logit", |b| {
        b.iter(|| {
            build_scatter(black_box(&spending), &outcome, "spending", "outcome", true).unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_stats, bench_charts);
criterion_main!(benches);
