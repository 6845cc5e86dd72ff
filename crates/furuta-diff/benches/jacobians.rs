//! Criterion benchmarks comparing finite-difference and dual-number Jacobians.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use furuta_diff::{
    finite_diff_linearization, finite_diff_step_jacobians, linearize, rk4_step_jacobians,
};
use furuta_math::StateVec;
use furuta_model::Model;
use furuta_rigid::{Rk4Solver, Solver};

/// A few operating points from hanging to upright.
fn operating_points() -> Vec<(&'static str, StateVec)> {
    vec![
        ("hanging", StateVec::zeros()),
        ("swinging", StateVec::new(0.3, 1.5, -2.0, 6.0)),
        ("upright", StateVec::new(0.0, std::f64::consts::PI, 0.0, 0.0)),
    ]
}

// ---------------------------------------------------------------------------
// Benchmark 1: Continuous-time linearization
// ---------------------------------------------------------------------------

fn bench_linearization(c: &mut Criterion) {
    let mut group = c.benchmark_group("linearization");
    let model = Model::nominal(0.004).unwrap();

    for (name, x) in operating_points() {
        group.bench_with_input(BenchmarkId::new("fd", name), &x, |b, x| {
            b.iter(|| finite_diff_linearization(&model, x, 0.5, 1e-6));
        });
        group.bench_with_input(BenchmarkId::new("dual", name), &x, |b, x| {
            b.iter(|| linearize(&model, x, 0.5));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark 2: One RK4 step
// ---------------------------------------------------------------------------

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("rk4_step");
    let model = Model::nominal(0.004).unwrap();
    let x = StateVec::new(0.3, 1.5, -2.0, 6.0);

    group.bench_function("integrate", |b| {
        b.iter(|| Rk4Solver.integrate(&model, &x, 0.5, 0.004));
    });

    group.bench_function("fd_jacobians", |b| {
        b.iter(|| finite_diff_step_jacobians(&model, &Rk4Solver, &x, 0.5, 0.004, 1e-6));
    });

    group.bench_function("dual_jacobians", |b| {
        b.iter(|| rk4_step_jacobians(&model, &x, 0.5, 0.004));
    });

    group.finish();
}

criterion_group!(benches, bench_linearization, bench_step);
criterion_main!(benches);
