//! Batch distribution for parallel simulation.
//!
//! Splits work into batches for parallel execution or progress reporting.
//! The Monte Carlo runner hands each batch of iterations to one Rayon task;
//! planning runs report progress at batch boundaries.

use crate::data::scenario::SimulationScenario;
use crate::error::SimResult;
use crate::optimizer::monte_carlo::{run_monte_carlo_parallel, MonteCarloConfig, MonteCarloResult};
use crate::parallel::pool::WorkerPool;

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
///
/// # Example
/// ```
/// # use recruitsim::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + if i < remainder { 1 } else { 0 };
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Run a parallel Monte Carlo simulation on `pool`.
/// Convenience wrapper for [run_monte_carlo_parallel] inside [WorkerPool::install],
/// used when a fixed worker count is configured.
pub fn run_simulation_batches(
    scenario: &SimulationScenario,
    config: &MonteCarloConfig,
    pool: &WorkerPool,
) -> SimResult<MonteCarloResult> {
    pool.install(|| run_monte_carlo_parallel(scenario, config))?
}
