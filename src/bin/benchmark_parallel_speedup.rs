//! Run Monte Carlo once in sequential and once in parallel, then print timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup [iterations]

use std::time::Instant;

use recruitsim::data::scenario::SimulationScenario;
use recruitsim::optimizer::monte_carlo::{
    run_monte_carlo, run_monte_carlo_parallel, MonteCarloConfig,
};

fn main() {
    let iterations = std::env::args()
        .nth(1)
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(200_000);
    let seed = 12345u64;
    let scenario = SimulationScenario::from_budget(
        "bench",
        "Benchmark scenario",
        300_000.0,
        12,
        0.8,
        vec!["zone-a".to_string()],
    );
    let config = MonteCarloConfig::seeded(iterations, seed);

    println!(
        "Monte Carlo: {} iterations (budget={}, weeks={}, quality={})",
        iterations,
        scenario.parameters.recruitment_budget,
        scenario.parameters.target_timeline_weeks,
        scenario.parameters.quality_threshold
    );
    println!();

    let t0 = Instant::now();
    let seq = match run_monte_carlo(&scenario, &config) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("sequential run failed: {err}");
            std::process::exit(1);
        }
    };
    let elapsed_seq = t0.elapsed();
    let seq_ms = elapsed_seq.as_secs_f64() * 1000.0;
    println!(
        "Sequential:  {:.2} ms  ({:.1} iterations/s)",
        seq_ms,
        iterations as f64 / elapsed_seq.as_secs_f64()
    );

    let t0 = Instant::now();
    let par = match run_monte_carlo_parallel(&scenario, &config) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("parallel run failed: {err}");
            std::process::exit(1);
        }
    };
    let elapsed_par = t0.elapsed();
    let par_ms = elapsed_par.as_secs_f64() * 1000.0;
    println!(
        "Parallel:    {:.2} ms  ({:.1} iterations/s)",
        par_ms,
        iterations as f64 / elapsed_par.as_secs_f64()
    );

    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", seq_ms / par_ms);

    if seq.outcomes != par.outcomes || seq.statistics != par.statistics {
        eprintln!("sequential and parallel results differ for seed {seed}");
        std::process::exit(1);
    }
    println!("(Results match sequential vs parallel)");
}
