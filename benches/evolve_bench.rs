//! Criterion benchmarks for u-evolve algorithms.
//!
//! Runs on catalog benchmarks (Sphere, Rastrigin) with a fixed evaluation
//! budget to measure algorithm overhead per evaluation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_evolve::algorithm::Algorithm;
use u_evolve::de::{DeConfig, DifferentialEvolution};
use u_evolve::mts::{MtsConfig, MultipleTrajectorySearch};
use u_evolve::problem::{Benchmark, BenchmarkFunction};
use u_evolve::task::{RepairStrategy, Task, TaskConfig};

const MAX_EVALS: usize = 20_000;

fn task(function: BenchmarkFunction, dim: usize) -> Task {
    let problem = Benchmark::new(function, dim).expect("valid benchmark");
    Task::new(problem, TaskConfig::default().with_max_evals(MAX_EVALS)).expect("valid task")
}

// ===========================================================================
// DE family on Sphere
// ===========================================================================

fn bench_de_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("de_sphere");
    group.sample_size(10);

    let variants = [
        DeConfig::de(),
        DeConfig::jde(),
        DeConfig::ms_de(),
        DeConfig::dyn_np_de(),
        DeConfig::aging_np_de(),
        DeConfig::de_mts(),
    ];
    for config in variants {
        let de = DifferentialEvolution::new(config.with_seed(42)).expect("valid preset");
        for &dim in &[10, 30] {
            let template = task(BenchmarkFunction::Sphere, dim);
            group.bench_with_input(
                BenchmarkId::new(de.name().to_string(), dim),
                &template,
                |b, t| {
                    b.iter(|| {
                        let mut t = t.fresh();
                        black_box(de.run(&mut t))
                    })
                },
            );
        }
    }
    group.finish();
}

// ===========================================================================
// MTS on Rastrigin
// ===========================================================================

fn bench_mts_rastrigin(c: &mut Criterion) {
    let mut group = c.benchmark_group("mts_rastrigin");
    group.sample_size(10);

    for config in [MtsConfig::mts(), MtsConfig::mts_v1()] {
        let mts = MultipleTrajectorySearch::new(config.with_population_size(10).with_seed(42))
            .expect("valid preset");
        for &dim in &[10, 30] {
            let template = task(BenchmarkFunction::Rastrigin, dim);
            group.bench_with_input(
                BenchmarkId::new(mts.name().to_string(), dim),
                &template,
                |b, t| {
                    b.iter(|| {
                        let mut t = t.fresh();
                        black_box(mts.run(&mut t))
                    })
                },
            );
        }
    }
    group.finish();
}

// ===========================================================================
// Task evaluation and repair overhead
// ===========================================================================

fn bench_task_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("task_eval");

    let point: Vec<f64> = (0..30).map(|i| (i as f64 - 15.0) * 0.7).collect();
    group.bench_function("sphere_d30", |b| {
        let mut t = task(BenchmarkFunction::Sphere, 30);
        b.iter(|| {
            t.reset();
            black_box(t.eval(black_box(&point)))
        })
    });

    let outside: Vec<f64> = (0..30).map(|i| (i as f64 - 15.0) * 2.0).collect();
    for repair in [RepairStrategy::Limit, RepairStrategy::Wang, RepairStrategy::Reflect] {
        let mut x = outside.clone();
        group.bench_function(BenchmarkId::new("repair", format!("{repair:?}")), |b| {
            let mut rng = rand::rng();
            b.iter(|| {
                x.copy_from_slice(&outside);
                repair.apply(black_box(&mut x), &[-5.12; 30], &[5.12; 30], &mut rng);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_de_sphere, bench_mts_rastrigin, bench_task_eval);
criterion_main!(benches);
