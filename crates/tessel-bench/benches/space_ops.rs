//! Criterion micro-benchmarks for distance and nearest-site queries.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tessel_core::SiteId;
use tessel_space::{nearest_index, site_color, DistanceMetric, Point, Site};
use tessel_test_utils::scattered_sites;

/// Benchmark: 10K distance evaluations per metric.
fn bench_distance(c: &mut Criterion) {
    let points = scattered_sites(10_000, 1000.0, 1000.0, 1);
    let origin = Point::new(500.0, 500.0);
    for metric in DistanceMetric::ALL {
        c.bench_function(&format!("distance_{metric}_10k"), |b| {
            b.iter(|| {
                for &p in &points {
                    black_box(metric.distance(origin, p));
                }
            });
        });
    }
}

/// Benchmark: nearest-site scan over 256 sites for 1K query points.
fn bench_nearest_256(c: &mut Criterion) {
    let sites: Vec<Site> = scattered_sites(256, 640.0, 480.0, 2)
        .into_iter()
        .enumerate()
        .map(|(i, p)| Site::new(SiteId(i as u64), p))
        .collect();
    let queries = scattered_sites(1000, 640.0, 480.0, 3);

    c.bench_function("nearest_256_sites_1k_queries", |b| {
        b.iter(|| {
            for &q in &queries {
                black_box(nearest_index(&sites, DistanceMetric::Euclidean, q));
            }
        });
    });
}

/// Benchmark: palette derivation for 1K site keys.
fn bench_site_color(c: &mut Criterion) {
    c.bench_function("site_color_1k", |b| {
        b.iter(|| {
            for key in 0..1000u64 {
                black_box(site_color(key));
            }
        });
    });
}

criterion_group!(benches, bench_distance, bench_nearest_256, bench_site_color);
criterion_main!(benches);
