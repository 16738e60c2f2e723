pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod optimizer;
pub mod parallel;
pub mod sampling;
pub mod server;
