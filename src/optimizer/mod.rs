pub mod model;
pub mod monte_carlo;
pub mod pareto;
pub mod ranking;
pub mod risk;
pub mod scenario_generator;
pub mod sensitivity;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::base::BaseData;
use crate::data::scenario::SimulationScenario;
use crate::error::{SimResult, SimulationError};
use crate::optimizer::model::ModelParameters;
use crate::optimizer::monte_carlo::{run_monte_carlo_batch, MonteCarloConfig, MonteCarloResult};
use crate::optimizer::pareto::{optimize_objectives, ObjectiveGrid, OptimizationResult};
use crate::optimizer::ranking::{rank_results, RankedScenario, COMPARISON_ITERATIONS};
use crate::optimizer::risk::{assess_risk, RiskAssessment};
use crate::optimizer::scenario_generator::{GenerationRequest, ScenarioGenerator};
use crate::parallel::batch_ranges;
use crate::sampling::Rng;

/// Number of progress-reporting batches for planning runs.
const PLAN_PROGRESS_BATCH_COUNT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub generation: GenerationRequest,
    pub iterations: usize,
    pub seed: Option<u64>,
    #[serde(default)]
    pub grid: ObjectiveGrid,
    #[serde(default)]
    pub model: ModelParameters,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            generation: GenerationRequest::default(),
            iterations: COMPARISON_ITERATIONS,
            seed: None,
            grid: ObjectiveGrid::default(),
            model: ModelParameters::default(),
        }
    }
}

/// Full planning pass: generated scenarios, their ranking, portfolio risk and the
/// recommended cost/speed/quality trade-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub seed: u64,
    pub scenarios: Vec<SimulationScenario>,
    pub ranking: Vec<RankedScenario>,
    pub risk: RiskAssessment,
    pub optimization: OptimizationResult,
}

/// generate → simulate → compare → optimize.
pub fn plan_scenarios(base: &BaseData, request: &PlanRequest) -> SimResult<PlanReport> {
    plan_scenarios_with_progress(base, request, |_, _| {})
}

/// Like [plan_scenarios] but simulates in batches and invokes `on_progress(done, total)`
/// with done/total counted in scenarios.
pub fn plan_scenarios_with_progress<F>(
    base: &BaseData,
    request: &PlanRequest,
    mut on_progress: F,
) -> SimResult<PlanReport>
where
    F: FnMut(usize, usize),
{
    let seed = request.seed.unwrap_or_else(Rng::entropy_seed);
    let mut generation = request.generation.clone();
    if generation.available_zones.is_empty() {
        generation.available_zones = base.zone_ids();
    }
    let scenarios = ScenarioGenerator::new(generation)?.generate(&mut Rng::new(seed));
    let total = scenarios.len();
    if total == 0 {
        return Err(SimulationError::EmptyInput("plan generated no scenarios"));
    }
    // Report total immediately so callers show "0 / total" while the first batch runs.
    on_progress(0, total);

    let mc_config = MonteCarloConfig {
        iterations: request.iterations,
        seed: Some(seed),
        model: request.model.clone(),
    };
    let mut results: Vec<MonteCarloResult> = Vec::with_capacity(total);
    for (start, end) in batch_ranges(total, PLAN_PROGRESS_BATCH_COUNT.min(total)) {
        results.extend(run_monte_carlo_batch(&scenarios[start..end], &mc_config)?);
        on_progress(end, total);
    }

    let ranking = rank_results(&scenarios, &results);
    let risk = assess_risk(base, &scenarios)?;
    let optimization = optimize_objectives(&request.grid)?;
    info!(
        scenarios = total,
        overall_risk = risk.overall_risk,
        strategy = %optimization.strategy,
        "planning pass finished"
    );

    Ok(PlanReport {
        seed,
        scenarios,
        ranking,
        risk,
        optimization,
    })
}
