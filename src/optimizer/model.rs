//! Constants and deterministic pieces of the hiring model shared by the Monte Carlo
//! simulator and the sensitivity analyzer.

use serde::{Deserialize, Serialize};

use crate::data::scenario::StrategyType;

/// Per-strategy dispersion: σ of the cost multiplier and gamma scale of the timeline multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyProfile {
    pub cost_std_dev: f64,
    pub timeline_scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    pub aggressive: StrategyProfile,
    pub moderate: StrategyProfile,
    pub conservative: StrategyProfile,
    /// Budget spent per hire when computing target hires.
    pub cost_per_hire: f64,
    /// Budget at which `budget_factor` reaches 1.
    pub budget_reference: f64,
    pub budget_factor_cap: f64,
    pub base_success_rate: f64,
    pub success_noise_std_dev: f64,
    pub success_rate_floor: f64,
    pub success_rate_ceiling: f64,
    /// Success rates strictly above this count toward `success_probability`.
    pub success_threshold: f64,
    pub strict_quality_threshold: f64,
    pub strict_quality_penalty: f64,
    pub cost_multiplier_floor: f64,
    pub timeline_multiplier_floor: f64,
    pub timeline_gamma_shape: u32,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            aggressive: StrategyProfile {
                cost_std_dev: 0.30,
                timeline_scale: 0.40,
            },
            moderate: StrategyProfile {
                cost_std_dev: 0.20,
                timeline_scale: 0.50,
            },
            conservative: StrategyProfile {
                cost_std_dev: 0.10,
                timeline_scale: 0.60,
            },
            cost_per_hire: 15_000.0,
            budget_reference: 200_000.0,
            budget_factor_cap: 2.0,
            base_success_rate: 0.6,
            success_noise_std_dev: 0.10,
            success_rate_floor: 0.1,
            success_rate_ceiling: 0.95,
            success_threshold: 0.7,
            strict_quality_threshold: 0.8,
            strict_quality_penalty: 0.8,
            cost_multiplier_floor: 0.5,
            timeline_multiplier_floor: 0.7,
            timeline_gamma_shape: 2,
        }
    }
}

impl ModelParameters {
    pub fn profile(&self, strategy: StrategyType) -> StrategyProfile {
        match strategy {
            StrategyType::Aggressive => self.aggressive,
            StrategyType::Moderate => self.moderate,
            StrategyType::Conservative => self.conservative,
        }
    }

    pub fn budget_factor(&self, budget: f64) -> f64 {
        (budget / self.budget_reference).min(self.budget_factor_cap)
    }

    /// Stricter quality bars reduce throughput.
    pub fn quality_penalty(&self, quality_threshold: f64) -> f64 {
        if quality_threshold > self.strict_quality_threshold {
            self.strict_quality_penalty
        } else {
            1.0
        }
    }

    /// Success rate before noise.
    pub fn expected_success_rate(&self, budget: f64, quality_threshold: f64) -> f64 {
        self.base_success_rate * self.budget_factor(budget) * self.quality_penalty(quality_threshold)
    }

    pub fn clamp_success_rate(&self, rate: f64) -> f64 {
        rate.clamp(self.success_rate_floor, self.success_rate_ceiling)
    }

    pub fn target_hires(&self, budget: f64) -> f64 {
        (budget / self.cost_per_hire).round()
    }

    /// `round(target_hires × success_rate)`.
    pub fn hires_for(&self, budget: f64, success_rate: f64) -> u32 {
        let hires = (self.target_hires(budget) * success_rate).round();
        if hires <= 0.0 {
            0
        } else if hires >= u32::MAX as f64 {
            u32::MAX
        } else {
            hires as u32
        }
    }

    /// Noise-free expected hires, used by the sensitivity analyzer.
    pub fn expected_hires(&self, budget: f64, quality_threshold: f64) -> f64 {
        self.target_hires(budget)
            * self.clamp_success_rate(self.expected_success_rate(budget, quality_threshold))
    }
}
