use crate::core::{CostSymmetry, SinkhornParams};
use crate::core::sinkhorn::DEFAULT_PARALLEL_THRESHOLD;
use crate::error::Result as MatchingResult;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub solver: SolverSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Default hyperparameters of the Sinkhorn solver
#[derive(Debug, Clone, Deserialize)]
pub struct SolverSettings {
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub symmetry: CostSymmetry,
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            lambda: default_lambda(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            symmetry: CostSymmetry::default(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

fn default_lambda() -> f64 { 1.0 }
fn default_max_iterations() -> usize { 1000 }
fn default_tolerance() -> f64 { 1e-6 }
fn default_parallel_threshold() -> usize { DEFAULT_PARALLEL_THRESHOLD }

impl SolverSettings {
    /// Validated solver parameters
    pub fn params(&self) -> MatchingResult<SinkhornParams> {
        let params = SinkhornParams {
            lambda: self.lambda,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            parallel_threshold: self.parallel_threshold,
        };
        params.validate()?;
        Ok(params)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Largest population accepted per request; the solver allocates n² floats
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
        }
    }
}

fn default_max_items() -> usize { 2000 }

/// JSON bytes budgeted per cost-table entry
const BYTES_PER_COST: usize = 32;

impl MatchingSettings {
    /// Request body limit fitting a dense `max_items`² cost table as JSON text
    pub fn payload_limit(&self) -> usize {
        self.max_items
            .saturating_mul(self.max_items)
            .saturating_mul(BYTES_PER_COST)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SINKHORN__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SINKHORN__SOLVER__LAMBDA -> solver.lambda
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SINKHORN")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
