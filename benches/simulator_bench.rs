//! Planner throughput benchmarks: single iterations, Pareto extraction, sensitivity sweeps.
//!
//! Run with: `cargo bench --bench simulator`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use recruitsim::data::scenario::SimulationScenario;
use recruitsim::optimizer::model::ModelParameters;
use recruitsim::optimizer::monte_carlo::simulate_iteration;
use recruitsim::optimizer::pareto::{pareto_front, pareto_front_naive, ObjectiveGrid};
use recruitsim::optimizer::sensitivity::analyze_sensitivity;
use recruitsim::sampling::Rng;

fn bench_iteration(c: &mut Criterion) {
    let scenario =
        SimulationScenario::from_budget("bench", "Bench", 300_000.0, 12, 0.8, Vec::new());
    let model = ModelParameters::default();
    let profile = model.profile(scenario.parameters.strategy_type);

    let mut group = c.benchmark_group("simulator");
    group.throughput(Throughput::Elements(1));
    group.bench_function("single_iteration", |b| {
        let mut rng = Rng::new(7);
        b.iter(|| black_box(simulate_iteration(&scenario.parameters, profile, &model, &mut rng)))
    });
    group.bench_function("sensitivity_sweep", |b| {
        b.iter(|| black_box(analyze_sensitivity(&scenario.parameters, &model)))
    });
    group.finish();
}

fn bench_pareto(c: &mut Criterion) {
    let points = match ObjectiveGrid::with_capacity(1.0).points() {
        Ok(points) => points,
        Err(err) => panic!("grid should build: {err}"),
    };

    let mut group = c.benchmark_group("pareto");
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("naive", |b| b.iter(|| black_box(pareto_front_naive(&points))));
    group.bench_function("sweep", |b| b.iter(|| black_box(pareto_front(&points))));
    group.finish();
}

criterion_group!(benches, bench_iteration, bench_pareto);
criterion_main!(benches);
