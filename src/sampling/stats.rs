//! Descriptive statistics over sample arrays.
//!
//! Every function rejects empty input with [SimulationError::EmptyInput] instead of
//! returning NaN. Variance is the population variance (divide by `n`).

use serde::{Deserialize, Serialize};

use crate::error::{SimResult, SimulationError};

/// Deviations below this fraction of the values themselves are rounding noise.
const ZERO_SPREAD_RATIO: f64 = 8.0 * f64::EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }
}

pub fn mean(values: &[f64]) -> SimResult<f64> {
    if values.is_empty() {
        return Err(SimulationError::EmptyInput("mean of empty sample"));
    }
    let sum: f64 = values.iter().sum();
    if !sum.is_finite() {
        return Err(SimulationError::NumericalOverflow("sample sum"));
    }
    Ok(sum / values.len() as f64)
}

pub fn variance(values: &[f64]) -> SimResult<f64> {
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    if !ss.is_finite() {
        return Err(SimulationError::NumericalOverflow("sample variance"));
    }
    Ok(ss / values.len() as f64)
}

pub fn std_dev(values: &[f64]) -> SimResult<f64> {
    variance(values).map(f64::sqrt)
}

/// Standard deviation over mean. Zero mean gives zero rather than infinity,
/// since every caller feeds non-negative quantities where a zero mean means "no activity".
pub fn coefficient_of_variation(values: &[f64]) -> SimResult<f64> {
    let m = mean(values)?;
    if m.abs() < f64::EPSILON {
        return Ok(0.0);
    }
    Ok(std_dev(values)? / m.abs())
}

/// Percentile `p` in `[0, 1]` of an already sorted sample, linear interpolation
/// between the closest ranks. Monotone in `p`.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> SimResult<f64> {
    if sorted.is_empty() {
        return Err(SimulationError::EmptyInput("percentile of empty sample"));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(SimulationError::invalid("percentile", format!("{p} outside [0, 1]")));
    }
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Sorted copy of `values` using a total order, so NaN never panics the sort.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

pub fn percentile(values: &[f64], p: f64) -> SimResult<f64> {
    percentile_sorted(&sorted(values), p)
}

/// 95% empirical interval: the [2.5th, 97.5th] percentile band.
pub fn confidence_interval_95(sorted_values: &[f64]) -> SimResult<Interval> {
    Ok(Interval {
        lower: percentile_sorted(sorted_values, 0.025)?,
        upper: percentile_sorted(sorted_values, 0.975)?,
    })
}

/// Pearson correlation coefficient.
///
/// Errors when lengths differ, when fewer than two pairs are given, or when
/// either side has zero variance (the coefficient is undefined there). Variance
/// counts as zero relative to the series magnitude, so tiny but genuine spreads
/// still correlate.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> SimResult<f64> {
    if xs.len() != ys.len() {
        return Err(SimulationError::invalid(
            "correlation",
            format!("length mismatch: {} vs {}", xs.len(), ys.len()),
        ));
    }
    if xs.len() < 2 {
        return Err(SimulationError::EmptyInput("correlation needs at least two pairs"));
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    let mut sx2 = 0.0;
    let mut sy2 = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
        sx2 += x * x;
        sy2 += y * y;
    }
    let noise = ZERO_SPREAD_RATIO * ZERO_SPREAD_RATIO;
    if vx <= noise * sx2 || vy <= noise * sy2 {
        return Err(SimulationError::invalid(
            "correlation",
            "zero variance in one of the series",
        ));
    }
    Ok((cov / (vx.sqrt() * vy.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "expected {b}, got {a}");
    }

    #[test]
    fn mean_and_variance_of_small_sample() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        approx_eq(mean(&xs).unwrap(), 5.0, 1e-12);
        approx_eq(variance(&xs).unwrap(), 4.0, 1e-12);
        approx_eq(std_dev(&xs).unwrap(), 2.0, 1e-12);
    }

    #[test]
    fn empty_sample_is_an_error() {
        assert_eq!(
            mean(&[]),
            Err(SimulationError::EmptyInput("mean of empty sample"))
        );
        assert!(percentile(&[], 0.5).is_err());
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        approx_eq(percentile(&xs, 0.0).unwrap(), 1.0, 1e-12);
        approx_eq(percentile(&xs, 0.5).unwrap(), 3.0, 1e-12);
        approx_eq(percentile(&xs, 1.0).unwrap(), 5.0, 1e-12);
        approx_eq(percentile(&xs, 0.1).unwrap(), 1.4, 1e-12);
    }

    #[test]
    fn percentile_rejects_out_of_range_p() {
        assert!(percentile(&[1.0], 1.5).is_err());
    }

    #[test]
    fn correlation_of_linear_series_is_one() {
        let xs = [-0.2, -0.1, 0.0, 0.1, 0.2];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x).collect();
        approx_eq(pearson_correlation(&xs, &ys).unwrap(), 1.0, 1e-12);
        let neg: Vec<f64> = xs.iter().map(|x| -3.0 * x + 1.0).collect();
        approx_eq(pearson_correlation(&xs, &neg).unwrap(), -1.0, 1e-12);
    }

    #[test]
    fn correlation_with_constant_series_is_an_error() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [4.0, 4.0, 4.0];
        assert!(matches!(
            pearson_correlation(&xs, &ys),
            Err(SimulationError::InvalidParameter { name: "correlation", .. })
        ));
    }

    #[test]
    fn correlation_ignores_series_scale() {
        let xs = [-0.2, -0.1, 0.0, 0.1, 0.2];
        let tiny: Vec<f64> = xs.iter().map(|x| 1e-9 * x).collect();
        approx_eq(pearson_correlation(&xs, &tiny).unwrap(), 1.0, 1e-9);
        let offset: Vec<f64> = xs.iter().map(|x| 1e6 - 4.5e-3 * x).collect();
        approx_eq(pearson_correlation(&xs, &offset).unwrap(), -1.0, 1e-6);
        // Rounding noise around a large constant is still zero variance.
        let flat = [1e10 + 0.1, 1e10 + 0.1, 1e10 + 0.1];
        assert!(pearson_correlation(&xs[..3], &flat).is_err());
    }

    #[test]
    fn coefficient_of_variation_handles_zero_mean() {
        approx_eq(coefficient_of_variation(&[0.0, 0.0]).unwrap(), 0.0, 1e-12);
        approx_eq(coefficient_of_variation(&[1.0, 3.0]).unwrap(), 0.5, 1e-12);
    }
}
