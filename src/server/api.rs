use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::data::base::BaseData;
use crate::data::scenario::{ScenarioParameters, SimulationScenario, StrategyType};
use crate::error::SimulationError;
use crate::optimizer::monte_carlo::{MonteCarloResult, Outcomes};
use crate::optimizer::pareto::{optimize_objectives, ObjectiveGrid, OptimizationResult};
use crate::optimizer::ranking::{compare_scenarios, ScenarioComparison};
use crate::optimizer::risk::{assess_risk, RiskAssessment};
use crate::optimizer::scenario_generator::{
    generate_scenarios, GenerationRequest, ParameterRange,
};
use crate::optimizer::sensitivity::{analyze_sensitivity, SensitivityResult};
use crate::parallel::run_simulation_batches;
use crate::sampling::Rng;

pub const MAX_ITERATIONS: usize = 100_000;
pub const MAX_GENERATED_SCENARIOS: usize = 1_000;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error("failed to serialize response: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ApiError {
    /// True for problems with the request itself (HTTP 400).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Serialize(_))
    }
}

/// Scenario as accepted over the API. Missing id/name are filled in;
/// a missing strategy is derived from the budget.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub recruitment_budget: f64,
    pub target_timeline_weeks: u32,
    pub quality_threshold: f64,
    #[serde(default)]
    pub zones_priority: Vec<String>,
    #[serde(default)]
    pub strategy_type: Option<StrategyType>,
}

impl ScenarioInput {
    pub fn into_scenario(self, index: usize) -> SimulationScenario {
        let id = self.id.unwrap_or_else(|| format!("scenario-{}", index + 1));
        let name = self.name.unwrap_or_else(|| id.clone());
        SimulationScenario {
            id,
            name,
            parameters: ScenarioParameters {
                strategy_type: self
                    .strategy_type
                    .unwrap_or_else(|| StrategyType::from_budget(self.recruitment_budget)),
                recruitment_budget: self.recruitment_budget,
                target_timeline_weeks: self.target_timeline_weeks,
                quality_threshold: self.quality_threshold,
                zones_priority: self.zones_priority,
            },
        }
    }
}

fn into_scenarios(inputs: Vec<ScenarioInput>) -> Vec<SimulationScenario> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| input.into_scenario(index))
        .collect()
}

fn clamp_iterations(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).clamp(1, MAX_ITERATIONS)
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(ApiError::Parse)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(ApiError::Serialize)
}

pub fn health_payload() -> Result<String, ApiError> {
    to_json(&serde_json::json!({
        "status": "ok",
        "service": "recruitsim-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulateRequest {
    pub scenario: ScenarioInput,
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    /// Raw per-iteration samples are omitted unless asked for.
    #[serde(default)]
    pub include_outcomes: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulateResponse {
    pub status: &'static str,
    pub engine: &'static str,
    pub result: MonteCarloResult,
}

pub fn simulate_payload(body: &str, config: &AppConfig) -> Result<String, ApiError> {
    let req: SimulateRequest = parse(body)?;
    let scenario = req.scenario.into_scenario(0);
    let mc_config = config.monte_carlo(
        Some(clamp_iterations(req.iterations, config.default_iterations)),
        req.seed,
    );
    let mut result = run_simulation_batches(&scenario, &mc_config, &config.worker_pool())?;
    if !req.include_outcomes {
        result.outcomes = Outcomes::default();
    }
    to_json(&SimulateResponse {
        status: "ok",
        engine: "monte_carlo_v1",
        result,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensitivityRequest {
    pub scenario: ScenarioInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct SensitivityResponse {
    pub status: &'static str,
    pub scenario_id: String,
    pub variables: Vec<SensitivityResult>,
}

pub fn sensitivity_payload(body: &str, config: &AppConfig) -> Result<String, ApiError> {
    let req: SensitivityRequest = parse(body)?;
    let scenario = req.scenario.into_scenario(0);
    let variables = analyze_sensitivity(&scenario.parameters, &config.model)?;
    to_json(&SensitivityResponse {
        status: "ok",
        scenario_id: scenario.id,
        variables,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptimizeRequest {
    #[serde(default)]
    pub grid: Option<ObjectiveGrid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizeResponse {
    pub status: &'static str,
    pub engine: &'static str,
    pub optimization: OptimizationResult,
}

pub fn optimize_payload(body: &str) -> Result<String, ApiError> {
    let req: OptimizeRequest = parse(body)?;
    let grid = req.grid.unwrap_or_default();
    let optimization = optimize_objectives(&grid)?;
    to_json(&OptimizeResponse {
        status: "ok",
        engine: "pareto_v1",
        optimization,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub count: Option<usize>,
    pub budget_range: Option<ParameterRange>,
    pub timeline_range: Option<ParameterRange>,
    #[serde(default)]
    pub available_zones: Vec<String>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub status: &'static str,
    pub seed: u64,
    pub scenarios: Vec<SimulationScenario>,
}

pub fn generate_payload(body: &str, config: &AppConfig) -> Result<String, ApiError> {
    let req: GenerateRequest = parse(body)?;
    let defaults = GenerationRequest::default();
    let count = req.count.unwrap_or(defaults.count);
    if count > MAX_GENERATED_SCENARIOS {
        return Err(ApiError::Validation(format!(
            "count must be at most {MAX_GENERATED_SCENARIOS}"
        )));
    }
    let request = GenerationRequest {
        count,
        budget_range: req.budget_range.unwrap_or(defaults.budget_range),
        timeline_range: req.timeline_range.unwrap_or(defaults.timeline_range),
        available_zones: req.available_zones,
    };
    let seed = req.seed.or(config.seed).unwrap_or_else(Rng::entropy_seed);
    let scenarios = generate_scenarios(&request, &mut Rng::new(seed))?;
    to_json(&GenerateResponse {
        status: "ok",
        seed,
        scenarios,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompareRequest {
    pub scenarios: Vec<ScenarioInput>,
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareResponse {
    pub status: &'static str,
    pub comparison: ScenarioComparison,
}

pub fn compare_payload(body: &str, config: &AppConfig) -> Result<String, ApiError> {
    let req: CompareRequest = parse(body)?;
    let scenarios = into_scenarios(req.scenarios);
    let comparison_config = config.comparison(
        Some(clamp_iterations(req.iterations, config.comparison_iterations)),
        req.seed,
    );
    let comparison = config
        .worker_pool()
        .install(|| compare_scenarios(&scenarios, &comparison_config))??;
    to_json(&CompareResponse {
        status: "ok",
        comparison,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskRequest {
    #[serde(default)]
    pub base: BaseData,
    pub scenarios: Vec<ScenarioInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskResponse {
    pub status: &'static str,
    pub risk: RiskAssessment,
}

pub fn risk_payload(body: &str) -> Result<String, ApiError> {
    let req: RiskRequest = parse(body)?;
    let scenarios = into_scenarios(req.scenarios);
    let risk = assess_risk(&req.base, &scenarios)?;
    to_json(&RiskResponse { status: "ok", risk })
}
