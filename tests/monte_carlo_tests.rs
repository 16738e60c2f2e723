use proptest::prelude::*;
use recruitsim::data::scenario::{SimulationScenario, StrategyType};
use recruitsim::error::SimulationError;
use recruitsim::optimizer::model::ModelParameters;
use recruitsim::optimizer::monte_carlo::{
    run_monte_carlo, run_monte_carlo_batch, run_monte_carlo_parallel, MonteCarloConfig,
};

fn scenario(budget: f64, weeks: u32, quality: f64) -> SimulationScenario {
    SimulationScenario::from_budget("mc", "Monte Carlo", budget, weeks, quality, Vec::new())
}

#[test]
fn mean_hires_is_exact_sample_mean() {
    let result = run_monte_carlo(&scenario(300_000.0, 12, 0.8), &MonteCarloConfig::seeded(2_000, 7))
        .expect("simulation should run");
    let sum: f64 = result.outcomes.hires.iter().map(|&h| f64::from(h)).sum();
    assert_eq!(result.statistics.mean_hires, sum / result.iterations as f64);
    assert_eq!(result.outcomes.len(), 2_000);
}

#[test]
fn success_probability_is_fraction_above_threshold() {
    let result = run_monte_carlo(&scenario(420_000.0, 10, 0.75), &MonteCarloConfig::seeded(1_500, 11))
        .expect("simulation should run");
    let above = result
        .outcomes
        .success_rates
        .iter()
        .filter(|&&rate| rate > 0.7)
        .count();
    assert_eq!(
        result.statistics.success_probability,
        above as f64 / result.iterations as f64
    );
    assert!((0.0..=1.0).contains(&result.statistics.success_probability));
}

#[test]
fn single_iteration_hires_follow_formula() {
    let result = run_monte_carlo(&scenario(200_000.0, 12, 0.7), &MonteCarloConfig::seeded(1, 99))
        .expect("simulation should run");
    let rate = result.outcomes.success_rates[0];
    let expected = ((200_000.0_f64 / 15_000.0).round() * rate).round() as u32;
    assert_eq!(result.outcomes.hires[0], expected);
}

#[test]
fn outcomes_respect_model_floors() {
    let model = ModelParameters::default();
    let budget = 180_000.0;
    let weeks = 8;
    let result = run_monte_carlo(&scenario(budget, weeks, 0.9), &MonteCarloConfig::seeded(3_000, 5))
        .expect("simulation should run");
    assert_eq!(result.outcomes.hires.len(), 3_000);
    for &cost in &result.outcomes.costs {
        assert!(cost >= budget * model.cost_multiplier_floor - 1e-9);
    }
    for &timeline in &result.outcomes.timelines {
        assert!(timeline >= f64::from(weeks) * model.timeline_multiplier_floor - 1e-9);
    }
    for &rate in &result.outcomes.success_rates {
        assert!((model.success_rate_floor..=model.success_rate_ceiling).contains(&rate));
    }
}

#[test]
fn parallel_matches_sequential_for_same_seed() {
    let s = scenario(350_000.0, 16, 0.85);
    let config = MonteCarloConfig::seeded(5_000, 2024);
    let seq = run_monte_carlo(&s, &config).expect("sequential run");
    let par = run_monte_carlo_parallel(&s, &config).expect("parallel run");
    assert_eq!(seq, par);
}

#[test]
fn unseeded_run_reports_replayable_seed() {
    let s = scenario(260_000.0, 12, 0.7);
    let config = MonteCarloConfig {
        iterations: 500,
        seed: None,
        ..MonteCarloConfig::default()
    };
    let first = run_monte_carlo(&s, &config).expect("unseeded run");
    let replay = run_monte_carlo(&s, &MonteCarloConfig::seeded(500, first.seed)).expect("replay");
    assert_eq!(first.outcomes, replay.outcomes);
}

#[test]
fn batch_preserves_order_and_shares_seed() {
    let scenarios = vec![
        scenario(150_000.0, 20, 0.6),
        scenario(300_000.0, 12, 0.8),
        scenario(480_000.0, 8, 0.9),
    ];
    let results = run_monte_carlo_batch(&scenarios, &MonteCarloConfig::seeded(400, 3))
        .expect("batch should run");
    assert_eq!(results.len(), 3);
    for (scenario, result) in scenarios.iter().zip(&results) {
        assert_eq!(result.scenario_id, scenario.id);
        assert_eq!(result.seed, 3);
    }
    assert_eq!(scenarios[2].parameters.strategy_type, StrategyType::Aggressive);
}

#[test]
fn rejects_invalid_parameters() {
    let err = run_monte_carlo(&scenario(-1.0, 12, 0.8), &MonteCarloConfig::seeded(10, 1))
        .expect_err("negative budget must fail");
    assert!(matches!(err, SimulationError::InvalidParameter { .. }));

    let err = run_monte_carlo(&scenario(200_000.0, 12, 0.8), &MonteCarloConfig::seeded(0, 1))
        .expect_err("zero iterations must fail");
    assert!(matches!(err, SimulationError::InvalidParameter { name: "iterations", .. }));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn percentiles_are_monotone(
        budget in 50_000.0f64..800_000.0,
        weeks in 1u32..52,
        quality in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let result = run_monte_carlo(&scenario(budget, weeks, quality), &MonteCarloConfig::seeded(200, seed))
            .expect("simulation should run");
        let stats = &result.statistics;
        prop_assert!(stats.p10_hires <= stats.p50_hires);
        prop_assert!(stats.p50_hires <= stats.p90_hires);
        prop_assert!(stats.p10_cost <= stats.p50_cost);
        prop_assert!(stats.p50_cost <= stats.p90_cost);
        prop_assert!((0.0..=1.0).contains(&stats.success_probability));
        let ci = &result.confidence_intervals;
        prop_assert!(ci.hires.contains(stats.p50_hires));
        prop_assert!(ci.cost.contains(stats.p50_cost));
        prop_assert!(!ci.cost.contains(ci.cost.upper + 1.0));
    }

    #[test]
    fn same_seed_same_result(seed in any::<u64>()) {
        let s = scenario(275_000.0, 10, 0.8);
        let config = MonteCarloConfig::seeded(100, seed);
        let a = run_monte_carlo(&s, &config).expect("first run");
        let b = run_monte_carlo(&s, &config).expect("second run");
        prop_assert_eq!(a, b);
    }
}
