use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::scenario::{ScenarioParameters, SimulationScenario, StrategyType};
use crate::error::{SimResult, SimulationError};
use crate::sampling::Rng;

/// Quality thresholds are drawn uniformly from this band.
pub const QUALITY_RANGE: ParameterRange = ParameterRange { min: 0.6, max: 0.95 };
/// Generated scenarios prioritise at most this many zones.
pub const MAX_PRIORITY_ZONES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
}

impl ParameterRange {
    fn validate(&self, name: &'static str) -> SimResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(SimulationError::invalid(name, "bounds must be finite"));
        }
        if self.min > self.max {
            return Err(SimulationError::invalid(
                name,
                format!("min {} exceeds max {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub count: usize,
    pub budget_range: ParameterRange,
    pub timeline_range: ParameterRange,
    #[serde(default)]
    pub available_zones: Vec<String>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            count: 5,
            budget_range: ParameterRange {
                min: 150_000.0,
                max: 500_000.0,
            },
            timeline_range: ParameterRange { min: 6.0, max: 24.0 },
            available_zones: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    request: GenerationRequest,
}

impl ScenarioGenerator {
    pub fn new(request: GenerationRequest) -> SimResult<Self> {
        request.budget_range.validate("budget_range")?;
        request.timeline_range.validate("timeline_range")?;
        if request.budget_range.min <= 0.0 {
            return Err(SimulationError::invalid("budget_range", "budgets must be positive"));
        }
        if request.timeline_range.max < 1.0 {
            return Err(SimulationError::invalid(
                "timeline_range",
                "must allow at least one week",
            ));
        }
        Ok(Self { request })
    }

    pub fn generate(&self, rng: &mut Rng) -> Vec<SimulationScenario> {
        let scenarios: Vec<SimulationScenario> = (0..self.request.count)
            .map(|index| self.generate_one(index, rng))
            .collect();
        debug!(count = scenarios.len(), "scenarios generated");
        scenarios
    }

    fn generate_one(&self, index: usize, rng: &mut Rng) -> SimulationScenario {
        let budget_range = self.request.budget_range;
        let timeline_range = self.request.timeline_range;

        let recruitment_budget = rng.uniform(budget_range.min, budget_range.max).round();
        let target_timeline_weeks =
            rng.uniform(timeline_range.min, timeline_range.max).round().max(1.0) as u32;
        let quality_threshold = rng.uniform(QUALITY_RANGE.min, QUALITY_RANGE.max);
        let zones_priority = pick_zones(&self.request.available_zones, rng);
        let strategy_type = StrategyType::from_budget(recruitment_budget);

        let mut id_bytes = [0u8; 16];
        rng.fill_bytes(&mut id_bytes);
        let id = uuid::Builder::from_random_bytes(id_bytes).into_uuid().to_string();

        SimulationScenario {
            id,
            name: format!("Scenario {} ({strategy_type})", index + 1),
            parameters: ScenarioParameters {
                recruitment_budget,
                target_timeline_weeks,
                quality_threshold,
                zones_priority,
                strategy_type,
            },
        }
    }
}

pub fn generate_scenarios(
    request: &GenerationRequest,
    rng: &mut Rng,
) -> SimResult<Vec<SimulationScenario>> {
    Ok(ScenarioGenerator::new(request.clone())?.generate(rng))
}

/// Random subset of 1..=3 zones, in draw order. Empty when no zones are available.
fn pick_zones(available: &[String], rng: &mut Rng) -> Vec<String> {
    if available.is_empty() {
        return Vec::new();
    }
    let max = available.len().min(MAX_PRIORITY_ZONES);
    let take = 1 + rng.below(max);
    let mut pool: Vec<&String> = available.iter().collect();
    // Partial Fisher-Yates: the first `take` slots end up as the sample.
    for i in 0..take {
        let j = i + rng.below(pool.len() - i);
        pool.swap(i, j);
    }
    pool.into_iter().take(take).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zones(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("zone-{i}")).collect()
    }

    #[test]
    fn generated_parameters_respect_ranges() {
        let request = GenerationRequest {
            count: 200,
            available_zones: zones(5),
            ..GenerationRequest::default()
        };
        let scenarios = generate_scenarios(&request, &mut Rng::new(11)).unwrap();
        assert_eq!(scenarios.len(), 200);
        for s in &scenarios {
            let p = &s.parameters;
            assert!((150_000.0..=500_000.0).contains(&p.recruitment_budget));
            assert!((6..=24).contains(&p.target_timeline_weeks));
            assert!((0.6..0.95).contains(&p.quality_threshold));
            assert!((1..=3).contains(&p.zones_priority.len()));
            assert_eq!(p.strategy_type, StrategyType::from_budget(p.recruitment_budget));
        }
    }

    #[test]
    fn zone_subset_has_no_duplicates() {
        let mut rng = Rng::new(4);
        for _ in 0..100 {
            let mut picked = pick_zones(&zones(4), &mut rng);
            let len = picked.len();
            picked.sort();
            picked.dedup();
            assert_eq!(picked.len(), len);
        }
    }

    #[test]
    fn no_zones_yields_empty_priority() {
        assert!(pick_zones(&[], &mut Rng::new(1)).is_empty());
        assert_eq!(pick_zones(&zones(1), &mut Rng::new(1)), zones(1));
    }

    #[test]
    fn same_seed_gives_same_scenarios() {
        let request = GenerationRequest::default();
        let a = generate_scenarios(&request, &mut Rng::new(3)).unwrap();
        let b = generate_scenarios(&request, &mut Rng::new(3)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a[0].id, a[1].id);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let request = GenerationRequest {
            budget_range: ParameterRange { min: 10.0, max: 5.0 },
            ..GenerationRequest::default()
        };
        assert!(matches!(
            generate_scenarios(&request, &mut Rng::new(1)),
            Err(SimulationError::InvalidParameter { name: "budget_range", .. })
        ));
    }
}
