use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::scenario::{ScenarioParameters, SimulationScenario};
use crate::error::{SimResult, SimulationError};
use crate::optimizer::model::{ModelParameters, StrategyProfile};
use crate::parallel::batch_ranges;
use crate::sampling::stats::{self, Interval};
use crate::sampling::Rng;

pub const DEFAULT_ITERATIONS: usize = 10_000;

/// Parallel runs split iterations into this many batches per worker thread.
const BATCHES_PER_THREAD: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub iterations: usize,
    /// When None, a seed is drawn from OS entropy and reported in the result.
    pub seed: Option<u64>,
    pub model: ModelParameters,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            model: ModelParameters::default(),
        }
    }
}

impl MonteCarloConfig {
    pub fn seeded(iterations: usize, seed: u64) -> Self {
        Self {
            iterations,
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// One sampled outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationOutcome {
    pub hires: u32,
    pub cost: f64,
    pub timeline: f64,
    pub success_rate: f64,
}

/// Raw samples, one entry per iteration in iteration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcomes {
    pub hires: Vec<u32>,
    pub costs: Vec<f64>,
    pub timelines: Vec<f64>,
    pub success_rates: Vec<f64>,
}

impl Outcomes {
    fn with_capacity(n: usize) -> Self {
        Self {
            hires: Vec::with_capacity(n),
            costs: Vec::with_capacity(n),
            timelines: Vec::with_capacity(n),
            success_rates: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, outcome: IterationOutcome) {
        self.hires.push(outcome.hires);
        self.costs.push(outcome.cost);
        self.timelines.push(outcome.timeline);
        self.success_rates.push(outcome.success_rate);
    }

    pub fn len(&self) -> usize {
        self.hires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hires.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean_hires: f64,
    pub p10_hires: f64,
    pub p50_hires: f64,
    pub p90_hires: f64,
    pub variance_hires: f64,
    pub mean_cost: f64,
    pub p10_cost: f64,
    pub p50_cost: f64,
    pub p90_cost: f64,
    pub variance_cost: f64,
    pub mean_timeline: f64,
    pub p50_timeline: f64,
    pub mean_success_rate: f64,
    /// Fraction of iterations whose success rate exceeded the model's success threshold.
    pub success_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceIntervals {
    pub hires: Interval,
    pub cost: Interval,
    pub timeline: Interval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub scenario_id: String,
    pub iterations: usize,
    pub seed: u64,
    pub outcomes: Outcomes,
    pub statistics: Statistics,
    pub confidence_intervals: ConfidenceIntervals,
}

pub fn run_monte_carlo(
    scenario: &SimulationScenario,
    config: &MonteCarloConfig,
) -> SimResult<MonteCarloResult> {
    run_monte_carlo_with_parallelism(scenario, config, false)
}

/// Like [run_monte_carlo] but spreads iterations across all CPU cores via Rayon.
/// Every iteration draws from its own derived stream, so the result is identical
/// to the sequential run for the same seed.
pub fn run_monte_carlo_parallel(
    scenario: &SimulationScenario,
    config: &MonteCarloConfig,
) -> SimResult<MonteCarloResult> {
    run_monte_carlo_with_parallelism(scenario, config, true)
}

/// Run several scenarios, one Rayon task per scenario. Results order matches input order.
/// All scenarios share one seed (common random numbers), so differences between
/// results come from the parameters and not from the draws.
pub fn run_monte_carlo_batch(
    scenarios: &[SimulationScenario],
    config: &MonteCarloConfig,
) -> SimResult<Vec<MonteCarloResult>> {
    let seed = config.seed.unwrap_or_else(Rng::entropy_seed);
    scenarios
        .par_iter()
        .map(|scenario| {
            let per_scenario = MonteCarloConfig {
                seed: Some(seed),
                ..config.clone()
            };
            run_monte_carlo_with_parallelism(scenario, &per_scenario, false)
        })
        .collect()
}

fn run_monte_carlo_with_parallelism(
    scenario: &SimulationScenario,
    config: &MonteCarloConfig,
    parallel: bool,
) -> SimResult<MonteCarloResult> {
    let params = &scenario.parameters;
    params.validate()?;
    if config.iterations == 0 {
        return Err(SimulationError::invalid("iterations", "must be at least 1"));
    }

    let seed = config.seed.unwrap_or_else(Rng::entropy_seed);
    let model = &config.model;
    let profile = model.profile(params.strategy_type);
    debug!(
        scenario = %scenario.id,
        strategy = %params.strategy_type,
        iterations = config.iterations,
        seed,
        parallel,
        "running monte carlo"
    );

    let run_one = |iteration: usize| {
        let mut rng = Rng::for_stream(seed, iteration as u64);
        simulate_iteration(params, profile, model, &mut rng)
    };

    let mut outcomes = Outcomes::with_capacity(config.iterations);
    if parallel {
        let num_batches = rayon::current_num_threads().max(1) * BATCHES_PER_THREAD;
        let batches: Vec<Vec<IterationOutcome>> = batch_ranges(config.iterations, num_batches)
            .into_par_iter()
            .map(|(start, end)| (start..end).map(run_one).collect())
            .collect();
        for outcome in batches.into_iter().flatten() {
            outcomes.push(outcome);
        }
    } else {
        for iteration in 0..config.iterations {
            outcomes.push(run_one(iteration));
        }
    }

    let (statistics, confidence_intervals) = summarize(&outcomes, model.success_threshold)?;
    debug!(
        scenario = %scenario.id,
        mean_hires = statistics.mean_hires,
        success_probability = statistics.success_probability,
        "monte carlo finished"
    );

    Ok(MonteCarloResult {
        scenario_id: scenario.id.clone(),
        iterations: config.iterations,
        seed,
        outcomes,
        statistics,
        confidence_intervals,
    })
}

/// Draw one outcome: cost and timeline multipliers, a noisy success rate, and the hires it yields.
pub fn simulate_iteration(
    params: &ScenarioParameters,
    profile: StrategyProfile,
    model: &ModelParameters,
    rng: &mut Rng,
) -> IterationOutcome {
    let budget = params.recruitment_budget;

    let cost_multiplier = rng.normal(1.0, profile.cost_std_dev);
    let cost = budget * cost_multiplier.max(model.cost_multiplier_floor);

    let timeline_multiplier = rng.gamma_int(model.timeline_gamma_shape, profile.timeline_scale);
    let timeline =
        f64::from(params.target_timeline_weeks) * timeline_multiplier.max(model.timeline_multiplier_floor);

    let noise = rng.normal(0.0, model.success_noise_std_dev);
    let success_rate = model
        .clamp_success_rate(model.expected_success_rate(budget, params.quality_threshold) + noise);

    IterationOutcome {
        hires: model.hires_for(budget, success_rate),
        cost,
        timeline,
        success_rate,
    }
}

/// Summary statistics and 95% empirical intervals for a set of outcomes.
pub fn summarize(
    outcomes: &Outcomes,
    success_threshold: f64,
) -> SimResult<(Statistics, ConfidenceIntervals)> {
    if outcomes.is_empty() {
        return Err(SimulationError::EmptyInput("monte carlo outcomes"));
    }
    let n = outcomes.len() as f64;

    let hires: Vec<f64> = outcomes.hires.iter().map(|&h| f64::from(h)).collect();
    let hires_sorted = stats::sorted(&hires);
    let costs_sorted = stats::sorted(&outcomes.costs);
    let timelines_sorted = stats::sorted(&outcomes.timelines);

    let successes = outcomes
        .success_rates
        .iter()
        .filter(|&&rate| rate > success_threshold)
        .count();

    let statistics = Statistics {
        mean_hires: stats::mean(&hires)?,
        p10_hires: stats::percentile_sorted(&hires_sorted, 0.10)?,
        p50_hires: stats::percentile_sorted(&hires_sorted, 0.50)?,
        p90_hires: stats::percentile_sorted(&hires_sorted, 0.90)?,
        variance_hires: stats::variance(&hires)?,
        mean_cost: stats::mean(&outcomes.costs)?,
        p10_cost: stats::percentile_sorted(&costs_sorted, 0.10)?,
        p50_cost: stats::percentile_sorted(&costs_sorted, 0.50)?,
        p90_cost: stats::percentile_sorted(&costs_sorted, 0.90)?,
        variance_cost: stats::variance(&outcomes.costs)?,
        mean_timeline: stats::mean(&outcomes.timelines)?,
        p50_timeline: stats::percentile_sorted(&timelines_sorted, 0.50)?,
        mean_success_rate: stats::mean(&outcomes.success_rates)?,
        success_probability: successes as f64 / n,
    };

    let intervals = ConfidenceIntervals {
        hires: stats::confidence_interval_95(&hires_sorted)?,
        cost: stats::confidence_interval_95(&costs_sorted)?,
        timeline: stats::confidence_interval_95(&timelines_sorted)?,
    };

    Ok((statistics, intervals))
}
