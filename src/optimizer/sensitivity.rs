//! One-at-a-time sensitivity analysis of expected hires.
//!
//! Each variable is perturbed by a fixed set of relative steps around its base
//! value while the others stay at base. The response is the model's noise-free
//! expectation, so the analysis is deterministic.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::scenario::ScenarioParameters;
use crate::error::{SimResult, SimulationError};
use crate::optimizer::model::ModelParameters;
use crate::sampling::stats;

/// Relative perturbations applied to every variable.
pub const PERTURBATION_STEPS: [f64; 5] = [-0.2, -0.1, 0.0, 0.1, 0.2];

const IMPACT_SCORE_THRESHOLD: f64 = 0.5;
const CORRELATION_THRESHOLD: f64 = 0.7;

pub const DEFAULT_MARKET_COMPETITION: f64 = 0.5;
pub const DEFAULT_SEASONAL_FACTOR: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityVariable {
    Budget,
    QualityThreshold,
    TimelineWeeks,
    MarketCompetition,
    SeasonalFactor,
}

impl SensitivityVariable {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Budget => "Recruitment budget",
            Self::QualityThreshold => "Quality threshold",
            Self::TimelineWeeks => "Timeline (weeks)",
            Self::MarketCompetition => "Market competition",
            Self::SeasonalFactor => "Seasonal factor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub variable: SensitivityVariable,
    pub base_value: f64,
    /// Plausible relative swing of the variable, reported alongside the result.
    pub variance_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub variable: SensitivityVariable,
    pub label: String,
    pub base_value: f64,
    pub variance_fraction: f64,
    pub impact_score: f64,
    pub correlation: f64,
    pub variance_explained: f64,
    pub recommendations: Vec<String>,
}

/// The five analysed variables, anchored on the scenario's own parameters.
pub fn default_variables(params: &ScenarioParameters) -> Vec<VariableSpec> {
    vec![
        VariableSpec {
            variable: SensitivityVariable::Budget,
            base_value: params.recruitment_budget,
            variance_fraction: 0.20,
        },
        VariableSpec {
            variable: SensitivityVariable::QualityThreshold,
            base_value: params.quality_threshold,
            variance_fraction: 0.10,
        },
        VariableSpec {
            variable: SensitivityVariable::TimelineWeeks,
            base_value: f64::from(params.target_timeline_weeks),
            variance_fraction: 0.25,
        },
        VariableSpec {
            variable: SensitivityVariable::MarketCompetition,
            base_value: DEFAULT_MARKET_COMPETITION,
            variance_fraction: 0.30,
        },
        VariableSpec {
            variable: SensitivityVariable::SeasonalFactor,
            base_value: DEFAULT_SEASONAL_FACTOR,
            variance_fraction: 0.15,
        },
    ]
}

pub fn analyze_sensitivity(
    params: &ScenarioParameters,
    model: &ModelParameters,
) -> SimResult<Vec<SensitivityResult>> {
    analyze_variables(params, &default_variables(params), model)
}

/// Analyse `variables` around `params`. Output is sorted by impact score, highest first.
pub fn analyze_variables(
    params: &ScenarioParameters,
    variables: &[VariableSpec],
    model: &ModelParameters,
) -> SimResult<Vec<SensitivityResult>> {
    params.validate()?;
    if variables.is_empty() {
        return Err(SimulationError::EmptyInput("sensitivity variables"));
    }

    let mut results = Vec::with_capacity(variables.len());
    for spec in variables {
        if !spec.base_value.is_finite() {
            return Err(SimulationError::invalid(
                "base_value",
                format!("{} must be finite", spec.variable.label()),
            ));
        }
        let impacts: Vec<f64> = PERTURBATION_STEPS
            .iter()
            .map(|step| impact(spec.variable, spec.base_value * (1.0 + step), params, model))
            .collect();
        if impacts.iter().any(|v| !v.is_finite()) {
            return Err(SimulationError::NumericalOverflow("sensitivity impact"));
        }

        // A constant response has no linear relation to the perturbation.
        let correlation = match stats::pearson_correlation(&PERTURBATION_STEPS, &impacts) {
            Ok(r) => r,
            Err(SimulationError::InvalidParameter { .. }) => 0.0,
            Err(err) => return Err(err),
        };
        let impact_score = correlation.abs() * stats::variance(&impacts)?;
        let variance_explained = correlation * correlation;

        debug!(
            variable = spec.variable.label(),
            correlation, impact_score, "sensitivity evaluated"
        );

        results.push(SensitivityResult {
            variable: spec.variable,
            label: spec.variable.label().to_string(),
            base_value: spec.base_value,
            variance_fraction: spec.variance_fraction,
            impact_score,
            correlation,
            variance_explained,
            recommendations: recommendations(spec, impact_score, correlation),
        });
    }

    results.sort_by(|left, right| {
        right
            .impact_score
            .total_cmp(&left.impact_score)
            .then_with(|| right.correlation.abs().total_cmp(&left.correlation.abs()))
    });
    Ok(results)
}

/// Expected hires when `variable` takes `value` and everything else stays at base.
fn impact(
    variable: SensitivityVariable,
    value: f64,
    params: &ScenarioParameters,
    model: &ModelParameters,
) -> f64 {
    let base_budget = params.recruitment_budget;
    let base_quality = params.quality_threshold;
    let base_hires = model.expected_hires(base_budget, base_quality);
    match variable {
        SensitivityVariable::Budget => model.expected_hires(value, base_quality),
        SensitivityVariable::QualityThreshold => model.expected_hires(base_budget, value),
        SensitivityVariable::TimelineWeeks => {
            if value <= 0.0 {
                f64::INFINITY
            } else {
                base_hires / value
            }
        }
        SensitivityVariable::MarketCompetition => base_hires * (1.0 - 0.5 * value),
        SensitivityVariable::SeasonalFactor => base_hires * value,
    }
}

fn recommendations(spec: &VariableSpec, impact_score: f64, correlation: f64) -> Vec<String> {
    let label = spec.variable.label();
    let mut out = Vec::new();
    if impact_score > IMPACT_SCORE_THRESHOLD {
        out.push(format!(
            "{label} has a high impact on expected hires; track it closely (typical swing ±{:.0}%).",
            spec.variance_fraction * 100.0
        ));
    }
    if correlation.abs() > CORRELATION_THRESHOLD {
        let direction = if correlation > 0.0 { "raises" } else { "lowers" };
        out.push(format!(
            "Increasing {} reliably {direction} expected hires (r = {correlation:.2}).",
            label.to_lowercase()
        ));
    }
    out
}
