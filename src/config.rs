//! Application configuration loaded from YAML.
//!
//! Path: `RECRUITSIM_CONFIG`, else `config/recruitsim.yaml`. A missing file means defaults.
//! `RECRUITSIM_BIND` overrides the server bind address.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::optimizer::model::ModelParameters;
use crate::optimizer::monte_carlo::{MonteCarloConfig, DEFAULT_ITERATIONS};
use crate::optimizer::ranking::{ComparisonConfig, COMPARISON_ITERATIONS};
use crate::parallel::WorkerPool;

pub const DEFAULT_CONFIG_PATH: &str = "config/recruitsim.yaml";
pub const CONFIG_PATH_ENV: &str = "RECRUITSIM_CONFIG";
pub const BIND_ENV: &str = "RECRUITSIM_BIND";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub default_iterations: usize,
    pub comparison_iterations: usize,
    /// Fixed seed for every run. None draws a fresh seed per run.
    pub seed: Option<u64>,
    /// Worker threads for parallel runs; 0 uses all cores.
    pub workers: usize,
    pub model: ModelParameters,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            default_iterations: DEFAULT_ITERATIONS,
            comparison_iterations: COMPARISON_ITERATIONS,
            seed: None,
            workers: 0,
            model: ModelParameters::default(),
        }
    }
}

impl AppConfig {
    /// Load from the configured path and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_path(&path)?;
        if let Ok(bind) = env::var(BIND_ENV) {
            config.bind_addr = bind;
        }
        Ok(config)
    }

    /// Parse a YAML config file. Returns defaults when the file does not exist.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    pub fn monte_carlo(&self, iterations: Option<usize>, seed: Option<u64>) -> MonteCarloConfig {
        MonteCarloConfig {
            iterations: iterations.unwrap_or(self.default_iterations),
            seed: seed.or(self.seed),
            model: self.model.clone(),
        }
    }

    pub fn comparison(&self, iterations: Option<usize>, seed: Option<u64>) -> ComparisonConfig {
        ComparisonConfig {
            iterations: iterations.unwrap_or(self.comparison_iterations),
            seed: seed.or(self.seed),
            model: self.model.clone(),
        }
    }

    pub fn worker_pool(&self) -> WorkerPool {
        WorkerPool::with_workers(self.workers)
    }
}
