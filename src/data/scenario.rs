//! Scenario definitions: the parameter set a simulation run consumes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SimResult, SimulationError};

/// Budget above which a scenario is classified aggressive.
pub const AGGRESSIVE_BUDGET_THRESHOLD: f64 = 400_000.0;
/// Budget above which a scenario is classified moderate.
pub const MODERATE_BUDGET_THRESHOLD: f64 = 250_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyType {
    Aggressive,
    Moderate,
    Conservative,
}

impl StrategyType {
    /// Classify by budget: `> 400k` aggressive, `> 250k` moderate, otherwise conservative.
    pub fn from_budget(budget: f64) -> Self {
        if budget > AGGRESSIVE_BUDGET_THRESHOLD {
            Self::Aggressive
        } else if budget > MODERATE_BUDGET_THRESHOLD {
            Self::Moderate
        } else {
            Self::Conservative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Moderate => "moderate",
            Self::Conservative => "conservative",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "aggressive" => Some(Self::Aggressive),
            "moderate" => Some(Self::Moderate),
            "conservative" => Some(Self::Conservative),
            _ => None,
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    pub recruitment_budget: f64,
    pub target_timeline_weeks: u32,
    pub quality_threshold: f64,
    #[serde(default)]
    pub zones_priority: Vec<String>,
    pub strategy_type: StrategyType,
}

impl ScenarioParameters {
    /// Reject parameter sets the simulation model cannot interpret.
    pub fn validate(&self) -> SimResult<()> {
        if !self.recruitment_budget.is_finite() || self.recruitment_budget <= 0.0 {
            return Err(SimulationError::invalid(
                "recruitment_budget",
                format!("must be a positive finite amount, got {}", self.recruitment_budget),
            ));
        }
        if self.target_timeline_weeks == 0 {
            return Err(SimulationError::invalid(
                "target_timeline_weeks",
                "must be at least one week",
            ));
        }
        if !(0.0..=1.0).contains(&self.quality_threshold) {
            return Err(SimulationError::invalid(
                "quality_threshold",
                format!("must be within [0, 1], got {}", self.quality_threshold),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationScenario {
    pub id: String,
    pub name: String,
    pub parameters: ScenarioParameters,
}

impl SimulationScenario {
    /// Build a scenario whose strategy follows the budget classification.
    pub fn from_budget(
        id: impl Into<String>,
        name: impl Into<String>,
        recruitment_budget: f64,
        target_timeline_weeks: u32,
        quality_threshold: f64,
        zones_priority: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parameters: ScenarioParameters {
                recruitment_budget,
                target_timeline_weeks,
                quality_threshold,
                zones_priority,
                strategy_type: StrategyType::from_budget(recruitment_budget),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_thresholds_are_exclusive_at_the_boundary() {
        assert_eq!(StrategyType::from_budget(400_001.0), StrategyType::Aggressive);
        assert_eq!(StrategyType::from_budget(400_000.0), StrategyType::Moderate);
        assert_eq!(StrategyType::from_budget(250_000.01), StrategyType::Moderate);
        assert_eq!(StrategyType::from_budget(250_000.0), StrategyType::Conservative);
        assert_eq!(StrategyType::from_budget(10.0), StrategyType::Conservative);
    }

    #[test]
    fn strategy_serializes_lowercase() {
        let json = serde_json::to_string(&StrategyType::Aggressive).unwrap();
        assert_eq!(json, "\"aggressive\"");
        assert_eq!(StrategyType::parse(" Moderate "), Some(StrategyType::Moderate));
        assert_eq!(StrategyType::parse("bold"), None);
    }

    #[test]
    fn validate_rejects_out_of_range_parameters() {
        let base = SimulationScenario::from_budget("s", "S", 200_000.0, 12, 0.8, vec![]).parameters;
        assert!(base.validate().is_ok());

        let bad_budget = ScenarioParameters {
            recruitment_budget: -1.0,
            ..base.clone()
        };
        assert!(matches!(
            bad_budget.validate(),
            Err(SimulationError::InvalidParameter { name: "recruitment_budget", .. })
        ));

        let bad_weeks = ScenarioParameters {
            target_timeline_weeks: 0,
            ..base.clone()
        };
        assert!(bad_weeks.validate().is_err());

        let bad_quality = ScenarioParameters {
            quality_threshold: 1.2,
            ..base
        };
        assert!(bad_quality.validate().is_err());
    }
}
