//! Compare sequential vs parallel Monte Carlo run times.
//!
//! Run with: `cargo bench --bench monte_carlo_parallel`
//! Or quick comparison: `cargo run --bin benchmark_parallel_speedup` (see src/bin)

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recruitsim::data::scenario::SimulationScenario;
use recruitsim::optimizer::monte_carlo::{
    run_monte_carlo, run_monte_carlo_batch, run_monte_carlo_parallel, MonteCarloConfig,
};

fn scenarios(count: usize) -> Vec<SimulationScenario> {
    (0..count)
        .map(|i| {
            SimulationScenario::from_budget(
                format!("bench-{i}"),
                format!("Bench {i}"),
                150_000.0 + 25_000.0 * i as f64,
                6 + (i as u32 % 18),
                0.6 + 0.02 * (i % 10) as f64,
                Vec::new(),
            )
        })
        .collect()
}

fn bench_monte_carlo_sequential_vs_parallel(c: &mut Criterion) {
    let scenario = &scenarios(1)[0];
    let config = MonteCarloConfig::seeded(50_000, 42);

    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("sequential", |b| {
        b.iter(|| black_box(run_monte_carlo(scenario, &config)))
    });

    group.bench_function("parallel", |b| {
        b.iter(|| black_box(run_monte_carlo_parallel(scenario, &config)))
    });

    let many = scenarios(16);
    let batch_config = MonteCarloConfig::seeded(1_000, 42);
    group.bench_function("batch_16_scenarios", |b| {
        b.iter(|| black_box(run_monte_carlo_batch(&many, &batch_config)))
    });

    group.finish();
}

criterion_group!(benches, bench_monte_carlo_sequential_vs_parallel);
criterion_main!(benches);
