use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::scenario::{SimulationScenario, StrategyType};
use crate::error::{SimResult, SimulationError};
use crate::optimizer::model::ModelParameters;
use crate::optimizer::monte_carlo::{run_monte_carlo_batch, MonteCarloConfig, MonteCarloResult};

/// Comparisons trade precision for breadth: fewer iterations per scenario.
pub const COMPARISON_ITERATIONS: usize = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    pub iterations: usize,
    pub seed: Option<u64>,
    pub model: ModelParameters,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            iterations: COMPARISON_ITERATIONS,
            seed: None,
            model: ModelParameters::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedScenario {
    pub rank: usize,
    pub scenario_id: String,
    pub name: String,
    pub strategy_type: StrategyType,
    pub success_probability: f64,
    pub mean_hires: f64,
    pub mean_cost: f64,
    /// None when the scenario is expected to hire nobody.
    pub cost_per_hire: Option<f64>,
    pub risk: RiskScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub seed: u64,
    pub iterations: usize,
    pub ranking: Vec<RankedScenario>,
}

/// Simulate every scenario and rank them. Best success probability first; ties go to the lower risk.
pub fn compare_scenarios(
    scenarios: &[SimulationScenario],
    config: &ComparisonConfig,
) -> SimResult<ScenarioComparison> {
    if scenarios.is_empty() {
        return Err(SimulationError::EmptyInput("no scenarios to compare"));
    }
    let seed = config.seed.unwrap_or_else(crate::sampling::Rng::entropy_seed);
    let mc_config = MonteCarloConfig {
        iterations: config.iterations,
        seed: Some(seed),
        model: config.model.clone(),
    };
    let results = run_monte_carlo_batch(scenarios, &mc_config)?;
    let ranking = rank_results(scenarios, &results);
    if let Some(best) = ranking.first() {
        info!(
            scenarios = ranking.len(),
            best = %best.name,
            success_probability = best.success_probability,
            "scenario comparison finished"
        );
    }
    Ok(ScenarioComparison {
        seed,
        iterations: config.iterations,
        ranking,
    })
}

/// Pair scenarios with their results (same order) and sort them into a ranking.
pub fn rank_results(
    scenarios: &[SimulationScenario],
    results: &[MonteCarloResult],
) -> Vec<RankedScenario> {
    let mut ranked: Vec<RankedScenario> = scenarios
        .iter()
        .zip(results)
        .map(|(scenario, result)| {
            let stats = &result.statistics;
            RankedScenario {
                rank: 0,
                scenario_id: scenario.id.clone(),
                name: scenario.name.clone(),
                strategy_type: scenario.parameters.strategy_type,
                success_probability: stats.success_probability,
                mean_hires: stats.mean_hires,
                mean_cost: stats.mean_cost,
                cost_per_hire: (stats.mean_hires > 0.0).then(|| stats.mean_cost / stats.mean_hires),
                risk: RiskScore {
                    value: risk_score(stats.variance_cost, stats.mean_cost, stats.success_probability),
                },
            }
        })
        .collect();

    ranked.sort_by(|left, right| {
        right
            .success_probability
            .total_cmp(&left.success_probability)
            .then_with(|| left.risk.value.total_cmp(&right.risk.value))
            .then_with(|| right.mean_hires.total_cmp(&left.mean_hires))
    });
    for (index, entry) in ranked.iter_mut().enumerate() {
        entry.rank = index + 1;
    }
    ranked
}

/// Cost volatility (coefficient of variation) scaled by the chance of missing the target.
pub fn risk_score(variance_cost: f64, mean_cost: f64, success_probability: f64) -> f64 {
    if mean_cost <= 0.0 {
        return 1.0 - success_probability;
    }
    (variance_cost.sqrt() / mean_cost) * (1.0 - success_probability)
}
