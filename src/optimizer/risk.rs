//! Heuristic risk scores for a set of candidate scenarios against the service history.
//!
//! Each component is a volatility ratio clamped to `[0, 1]`; the overall score is their
//! unweighted mean.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::data::base::BaseData;
use crate::data::scenario::SimulationScenario;
use crate::error::{SimResult, SimulationError};
use crate::sampling::stats;

/// Used for market risk when the history is too short to measure volatility.
pub const NEUTRAL_MARKET_RISK: f64 = 0.5;
/// Months of service history needed before market volatility is measured.
pub const MIN_HISTORY_MONTHS: usize = 2;

const LOW_RISK_LIMIT: f64 = 0.3;
const MEDIUM_RISK_LIMIT: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < LOW_RISK_LIMIT {
            Self::Low
        } else if score < MEDIUM_RISK_LIMIT {
            Self::Medium
        } else {
            Self::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub market_risk: f64,
    pub execution_risk: f64,
    pub financial_risk: f64,
    pub overall_risk: f64,
    pub level: RiskLevel,
    /// False when market risk fell back to the neutral prior.
    pub market_history_sufficient: bool,
    pub history_months: usize,
    /// Open positions summed over the zone metrics, reported as demand context.
    pub open_positions: u32,
}

pub fn assess_risk(base: &BaseData, scenarios: &[SimulationScenario]) -> SimResult<RiskAssessment> {
    if scenarios.is_empty() {
        return Err(SimulationError::EmptyInput("no scenarios to assess"));
    }

    let monthly: Vec<f64> = base
        .monthly_service_counts()
        .into_values()
        .map(|count| count as f64)
        .collect();
    let history_months = monthly.len();
    let market_history_sufficient = history_months >= MIN_HISTORY_MONTHS;
    let market_risk = if market_history_sufficient {
        market_risk(&monthly)?
    } else {
        warn!(
            history_months,
            required = MIN_HISTORY_MONTHS,
            "service history too short, using neutral market risk"
        );
        NEUTRAL_MARKET_RISK
    };

    let execution_risk = execution_risk(scenarios)?;
    let financial_risk = financial_risk(scenarios)?;
    let overall_risk = (market_risk + execution_risk + financial_risk) / 3.0;

    Ok(RiskAssessment {
        market_risk,
        execution_risk,
        financial_risk,
        overall_risk,
        level: RiskLevel::from_score(overall_risk),
        market_history_sufficient,
        history_months,
        open_positions: base.total_open_positions(),
    })
}

/// Volatility of monthly demand.
pub fn market_risk(monthly_counts: &[f64]) -> SimResult<f64> {
    if monthly_counts.len() < MIN_HISTORY_MONTHS {
        return Err(SimulationError::EmptyInput("market risk needs two months of history"));
    }
    Ok(stats::coefficient_of_variation(monthly_counts)?.clamp(0.0, 1.0))
}

/// Spread of target timelines across the scenarios.
pub fn execution_risk(scenarios: &[SimulationScenario]) -> SimResult<f64> {
    let weeks: Vec<f64> = scenarios
        .iter()
        .map(|s| f64::from(s.parameters.target_timeline_weeks))
        .collect();
    Ok(stats::coefficient_of_variation(&weeks)?.clamp(0.0, 1.0))
}

/// Spread of budgets across the scenarios.
pub fn financial_risk(scenarios: &[SimulationScenario]) -> SimResult<f64> {
    let budgets: Vec<f64> = scenarios
        .iter()
        .map(|s| s.parameters.recruitment_budget)
        .collect();
    Ok(stats::coefficient_of_variation(&budgets)?.clamp(0.0, 1.0))
}
