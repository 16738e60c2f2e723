//! Seedable PRNG for scenario simulation. Uses SplitMix64 for throughput and good statistical quality.
//! Deterministic: same seed produces the same sequence. Not cryptographically secure.
//!
//! Continuous variates are built on top of the raw stream:
//! - uniform in `[0, 1)` from the top 53 bits
//! - normal via the Box–Muller transform
//! - gamma with integer shape as a sum of exponentials

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

/// 2^-53, maps 53 random bits onto `[0, 1)`.
const UNIT_SCALE: f64 = 1.0 / (1u64 << 53) as f64;

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generator for iteration `stream` of a run seeded with `seed`.
    /// Streams never share positions, so iterations are independent of scheduling.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        Self::new(derive_stream_seed(seed, stream))
    }

    /// Seed from OS entropy, for callers that did not ask for a reproducible run.
    pub fn entropy_seed() -> u64 {
        let mut bytes = [0u8; 8];
        match getrandom::getrandom(&mut bytes) {
            Ok(()) => u64::from_le_bytes(bytes),
            Err(err) => {
                tracing::warn!(%err, "os entropy unavailable, falling back to clock seed");
                let nanos = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or(0);
                mix64(nanos)
            }
        }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        mix64(self.state)
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * UNIT_SCALE
    }

    /// Uniform in `[low, high)`. Returns `low` when the range is empty.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        low + (high - low) * self.next_f64()
    }

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    pub fn below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        ((self.next_f64() * bound as f64) as usize).min(bound.saturating_sub(1))
    }

    /// Standard normal variate via Box–Muller. Only the cosine branch is used so
    /// every call consumes exactly two uniforms.
    pub fn standard_normal(&mut self) -> f64 {
        // 1 - u keeps the log argument in (0, 1].
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        mean + std_dev * self.standard_normal()
    }

    /// Exponential variate with the given scale (mean).
    pub fn exponential(&mut self, scale: f64) -> f64 {
        -scale * (1.0 - self.next_f64()).ln()
    }

    /// Gamma variate with integer shape `k` and `scale`, as the sum of `k` exponentials.
    pub fn gamma_int(&mut self, shape: u32, scale: f64) -> f64 {
        (0..shape).map(|_| self.exponential(scale)).sum()
    }

    pub fn fill_bytes(&mut self, out: &mut [u8]) {
        for chunk in out.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
    z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
    z ^ (z >> 31)
}

/// Seed for an independent stream. Plain `seed + stream` would make stream `n` a
/// shifted copy of stream `n - 1` under SplitMix64, so both inputs are mixed.
pub fn derive_stream_seed(seed: u64, stream: u64) -> u64 {
    mix64(seed ^ mix64(stream.wrapping_add(SPLITMIX64_GOLDEN)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix64_deterministic() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn splitmix64_different_seeds_differ() {
        let mut a = Rng::new(1);
        let mut b = Rng::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn adjacent_streams_do_not_overlap() {
        let mut first = Rng::for_stream(42, 0);
        let mut second = Rng::for_stream(42, 1);
        first.next_u64();
        assert_ne!(first.next_u64(), second.next_u64());
    }

    #[test]
    fn next_f64_stays_in_unit_interval() {
        let mut rng = Rng::new(99);
        for _ in 0..10_000 {
            let u = rng.next_f64();
            assert!((0.0..1.0).contains(&u), "u={u}");
        }
    }

    #[test]
    fn normal_sample_moments_are_close() {
        let mut rng = Rng::new(2024);
        let n = 50_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.normal(1.0, 0.2)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 1.0).abs() < 0.01, "mean={mean}");
        assert!((var.sqrt() - 0.2).abs() < 0.01, "std={}", var.sqrt());
    }

    #[test]
    fn gamma_mean_is_shape_times_scale() {
        let mut rng = Rng::new(5);
        let n = 50_000;
        let mean = (0..n).map(|_| rng.gamma_int(2, 0.5)).sum::<f64>() / n as f64;
        assert!((mean - 1.0).abs() < 0.02, "mean={mean}");
    }

    #[test]
    fn below_respects_bound() {
        let mut rng = Rng::new(3);
        for _ in 0..1_000 {
            assert!(rng.below(3) < 3);
        }
    }
}
