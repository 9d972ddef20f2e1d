//! Benchmarks for the hot paths: bootstrap resampling and a full metric
//! analysis.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use groupwise::analysis::bootstrap::bootstrap_ci;
use groupwise::analysis::effect::{cliffs_delta, cohens_d_pooled};
use groupwise::Engine;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

fn sample(rng: &mut Xoshiro256PlusPlus, n: usize, loc: f64) -> Vec<f64> {
    (0..n).map(|_| loc + rng.random_range(-1.0..1.0)).collect()
}

fn bench_bootstrap(c: &mut Criterion) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
    let mut group = c.benchmark_group("bootstrap_ci");

    for n in [20usize, 100, 500] {
        let a = sample(&mut rng, n, 10.0);
        let b = sample(&mut rng, n, 11.0);
        group.bench_with_input(BenchmarkId::new("cohens_d", n), &n, |bench, _| {
            bench.iter(|| bootstrap_ci(&a, &b, cohens_d_pooled, 10_000, 42));
        });
        group.bench_with_input(BenchmarkId::new("cliffs_delta", n), &n, |bench, _| {
            bench.iter(|| bootstrap_ci(&a, &b, cliffs_delta, 10_000, 42));
        });
    }
    group.finish();
}

fn bench_analyze_metric(c: &mut Criterion) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
    let a = sample(&mut rng, 50, 10.0);
    let b = sample(&mut rng, 50, 10.5);
    let g3 = sample(&mut rng, 50, 11.0);
    let engine = Engine::with_defaults();

    c.bench_function("analyze_metric/2_groups", |bench| {
        bench.iter(|| engine.analyze_metric("m", &[("a", &a), ("b", &b)]).unwrap());
    });
    c.bench_function("analyze_metric/3_groups", |bench| {
        bench.iter(|| {
            engine
                .analyze_metric("m", &[("a", &a), ("b", &b), ("c", &g3)])
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_bootstrap, bench_analyze_metric);
criterion_main!(benches);
