//! Multi-objective trade-off search over (cost, speed, quality).
//!
//! Cost is minimised, speed and quality are maximised. The grid is enumerated
//! through integer indices so every coordinate is an exact multiple of the step.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimResult, SimulationError};

const COST_WEIGHT: f64 = 0.3;
const SPEED_WEIGHT: f64 = 0.4;
const QUALITY_WEIGHT: f64 = 0.3;
/// Cost is inverted as `COST_PIVOT - cost` so cheaper points score higher.
const COST_PIVOT: f64 = 2.0;
/// Upper bound on enumerated grid points; finer grids are rejected.
pub const MAX_GRID_POINTS: usize = 200_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Number of grid values on this axis. None when the count is not representable.
    fn count(&self, step: f64) -> Option<usize> {
        let steps = ((self.max - self.min) / step + 1e-9).floor();
        if !steps.is_finite() || steps >= MAX_GRID_POINTS as f64 {
            return None;
        }
        Some(steps as usize + 1)
    }

    fn values(&self, step: f64, count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| round_to_step(self.min + i as f64 * step, step))
            .collect()
    }
}

fn round_to_step(value: f64, step: f64) -> f64 {
    let decimals = (-step.log10()).ceil().max(0.0) as i32 + 2;
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveGrid {
    pub cost: AxisRange,
    pub speed: AxisRange,
    pub quality: AxisRange,
    pub step: f64,
    /// Opt-in feasibility limit `speed × quality ≤ capacity × cost`. None keeps the full grid.
    pub capacity: Option<f64>,
}

impl Default for ObjectiveGrid {
    fn default() -> Self {
        Self {
            cost: AxisRange { min: 0.5, max: 2.0 },
            speed: AxisRange { min: 0.5, max: 2.0 },
            quality: AxisRange { min: 0.5, max: 1.0 },
            step: 0.1,
            capacity: None,
        }
    }
}

impl ObjectiveGrid {
    /// The full box with no feasibility limit.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// The default box restricted to `speed × quality ≤ capacity × cost`.
    pub fn with_capacity(capacity: f64) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Validate the grid and return the per-axis value counts (cost, speed, quality).
    fn validate(&self) -> SimResult<[usize; 3]> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(SimulationError::invalid("step", "must be positive"));
        }
        for (name, axis) in [("cost", self.cost), ("speed", self.speed), ("quality", self.quality)] {
            if !axis.min.is_finite() || !axis.max.is_finite() || axis.min > axis.max {
                return Err(SimulationError::invalid(
                    name,
                    format!("range [{}, {}] is not ordered", axis.min, axis.max),
                ));
            }
        }
        if let Some(capacity) = self.capacity {
            if !capacity.is_finite() || capacity <= 0.0 {
                return Err(SimulationError::invalid("capacity", "must be positive"));
            }
        }
        let too_fine = || {
            SimulationError::invalid(
                "step",
                format!("{} gives more than {MAX_GRID_POINTS} grid points", self.step),
            )
        };
        let counts = [
            self.cost.count(self.step).ok_or_else(too_fine)?,
            self.speed.count(self.step).ok_or_else(too_fine)?,
            self.quality.count(self.step).ok_or_else(too_fine)?,
        ];
        let total = counts[0]
            .checked_mul(counts[1])
            .and_then(|n| n.checked_mul(counts[2]))
            .ok_or_else(too_fine)?;
        if total > MAX_GRID_POINTS {
            return Err(too_fine());
        }
        Ok(counts)
    }

    /// Every feasible point of the grid, cost-major order.
    pub fn points(&self) -> SimResult<Vec<ParetoPoint>> {
        let [cost_count, speed_count, quality_count] = self.validate()?;
        let costs = self.cost.values(self.step, cost_count);
        let speeds = self.speed.values(self.step, speed_count);
        let qualities = self.quality.values(self.step, quality_count);
        let mut points = Vec::with_capacity(cost_count * speed_count * quality_count);
        for &cost in &costs {
            for &speed in &speeds {
                for &quality in &qualities {
                    let feasible = self
                        .capacity
                        .map_or(true, |capacity| speed * quality <= capacity * cost + 1e-9);
                    if feasible {
                        points.push(ParetoPoint::new(cost, speed, quality));
                    }
                }
            }
        }
        Ok(points)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParetoPoint {
    pub cost: f64,
    pub speed: f64,
    pub quality: f64,
    pub efficiency: f64,
}

impl ParetoPoint {
    pub fn new(cost: f64, speed: f64, quality: f64) -> Self {
        Self {
            cost,
            speed,
            quality,
            efficiency: efficiency_score(cost, speed, quality),
        }
    }

    /// True when `self` is at least as good on every axis and strictly better on one.
    pub fn dominates(&self, other: &ParetoPoint) -> bool {
        let no_worse =
            self.cost <= other.cost && self.speed >= other.speed && self.quality >= other.quality;
        let better =
            self.cost < other.cost || self.speed > other.speed || self.quality > other.quality;
        no_worse && better
    }
}

pub fn efficiency_score(cost: f64, speed: f64, quality: f64) -> f64 {
    COST_WEIGHT * (COST_PIVOT - cost) + SPEED_WEIGHT * speed + QUALITY_WEIGHT * quality
}

/// Pairwise O(n²) front extraction. Kept as the reference the sweep is checked against.
pub fn pareto_front_naive(points: &[ParetoPoint]) -> Vec<ParetoPoint> {
    points
        .iter()
        .filter(|candidate| !points.iter().any(|other| other.dominates(candidate)))
        .copied()
        .collect()
}

/// Sort-and-sweep front extraction.
///
/// After sorting by (cost ↑, speed ↓, quality ↓) a dominator always precedes the
/// point it dominates, and anything dominated by a discarded point is also dominated
/// by a front member, so each point only needs checking against the front so far.
/// Output is in sort order.
pub fn pareto_front(points: &[ParetoPoint]) -> Vec<ParetoPoint> {
    let mut ordered = points.to_vec();
    ordered.sort_by(sweep_order);
    let mut front: Vec<ParetoPoint> = Vec::new();
    for point in ordered {
        if !front.iter().any(|kept| kept.dominates(&point)) {
            front.push(point);
        }
    }
    front
}

fn sweep_order(left: &ParetoPoint, right: &ParetoPoint) -> Ordering {
    left.cost
        .total_cmp(&right.cost)
        .then_with(|| right.speed.total_cmp(&left.speed))
        .then_with(|| right.quality.total_cmp(&left.quality))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub pareto_front: Vec<ParetoPoint>,
    pub recommended: ParetoPoint,
    pub strategy: String,
    pub trade_offs: Vec<String>,
    pub evaluated_points: usize,
}

pub fn optimize_objectives(grid: &ObjectiveGrid) -> SimResult<OptimizationResult> {
    let points = grid.points()?;
    let front = pareto_front(&points);
    let recommended = front
        .iter()
        .copied()
        .max_by(|left, right| {
            left.efficiency
                .total_cmp(&right.efficiency)
                // Prefer the cheaper point on ties; max_by keeps the last maximum.
                .then_with(|| right.cost.total_cmp(&left.cost))
        })
        .ok_or(SimulationError::EmptyInput("no feasible point in objective grid"))?;

    debug!(
        evaluated = points.len(),
        front = front.len(),
        efficiency = recommended.efficiency,
        "pareto front extracted"
    );

    Ok(OptimizationResult {
        strategy: describe_strategy(&recommended),
        trade_offs: trade_off_notes(),
        evaluated_points: points.len(),
        pareto_front: front,
        recommended,
    })
}

/// Plain-language strategy for a point, from threshold rules on each axis.
pub fn describe_strategy(point: &ParetoPoint) -> String {
    let budget = if point.cost < 1.0 {
        "Lean budget"
    } else if point.cost > 1.5 {
        "Premium investment"
    } else {
        "Balanced budget"
    };
    let pace = if point.speed > 1.5 {
        "accelerated hiring"
    } else if point.speed < 1.0 {
        "steady pacing"
    } else {
        "standard pace"
    };
    let bar = if point.quality > 0.85 {
        "a high quality bar"
    } else {
        "a flexible quality bar"
    };
    format!("{budget} with {pace} and {bar}")
}

fn trade_off_notes() -> Vec<String> {
    [
        "Cutting cost slows hiring: lean budgets rely on organic sourcing and take longer to fill seats.",
        "Faster hiring strains quality: compressing the timeline leaves less room for screening.",
        "A higher quality bar raises cost per hire and reduces throughput in competitive zones.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
