use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::connectivity::ConnectivityMode;

/// Default maximum gap, in metres, at which two segment endpoints are joined.
pub const DEFAULT_CONNECTION_THRESHOLD_M: f64 = 50.0;

/// Default cap on A* node expansions.
pub const DEFAULT_MAX_ITERATIONS: usize = 50_000;

/// Environment variable overriding [`EngineConfig::connection_threshold_m`].
pub const THRESHOLD_ENV: &str = "PISTEPATH_CONNECTION_THRESHOLD_M";

/// Environment variable overriding [`EngineConfig::max_iterations`].
pub const MAX_ITERATIONS_ENV: &str = "PISTEPATH_MAX_ITERATIONS";

/// Tunables shared by the resolver, validator and path finder.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Maximum endpoint gap in metres for two segments to count as joined.
    pub connection_threshold_m: f64,
    /// Maximum number of A* expansions before the search gives up.
    pub max_iterations: usize,
    /// Optimistic speed for the A* heuristic. `None` derives it from the catalog.
    pub heuristic_speed_kmh: Option<f64>,
    /// Whether precomputed `connectsTo` lists are trusted.
    pub connectivity_mode: ConnectivityMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            connection_threshold_m: DEFAULT_CONNECTION_THRESHOLD_M,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            heuristic_speed_kmh: None,
            connectivity_mode: ConnectivityMode::Precomputed,
        }
    }
}

impl EngineConfig {
    /// Defaults with any valid environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(threshold) = read_env::<f64>(THRESHOLD_ENV).filter(|v| *v >= 0.0) {
            config.connection_threshold_m = threshold;
        }
        if let Some(iterations) = read_env::<usize>(MAX_ITERATIONS_ENV).filter(|v| *v > 0) {
            config.max_iterations = iterations;
        }
        config
    }

    pub fn with_threshold(mut self, meters: f64) -> Self {
        self.connection_threshold_m = meters;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn with_connectivity_mode(mut self, mode: ConnectivityMode) -> Self {
        self.connectivity_mode = mode;
        self
    }
}

fn read_env<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring unparsable configuration override");
            None
        }
    }
}
