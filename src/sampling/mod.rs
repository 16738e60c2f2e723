pub mod rng;
pub mod stats;

pub use rng::{derive_stream_seed, Rng};
pub use stats::Interval;
