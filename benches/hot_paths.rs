use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gadm_map::data::resample_ring;
use gadm_map::map::projection::robinson;
use glam::DVec2;

/// Dense coastline-like ring: a jittered circle with 50k points
fn dense_ring(n: usize) -> Vec<DVec2> {
    (0..n)
        .map(|i| {
            let a = std::f64::consts::TAU * i as f64 / n as f64;
            let r = 50.0 + (i % 7) as f64 * 0.1;
            DVec2::new(r * a.cos(), r * a.sin())
        })
        .collect()
}

fn bench_resample(c: &mut Criterion) {
    let ring = dense_ring(50_000);
    c.bench_function("resample_50k_ring", |b| {
        b.iter(|| resample_ring(black_box(&ring)))
    });
}

fn bench_robinson(c: &mut Criterion) {
    let ring = dense_ring(10_000);
    c.bench_function("robinson_10k_points", |b| {
        b.iter(|| {
            let mut acc = DVec2::ZERO;
            for p in &ring {
                acc += robinson(black_box(p.x), black_box(p.y.clamp(-90.0, 90.0)));
            }
            acc
        })
    });
}

criterion_group!(benches, bench_resample, bench_robinson);
criterion_main!(benches);
