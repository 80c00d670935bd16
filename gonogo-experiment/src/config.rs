use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("total_rounds must be at least 1")]
    NoRounds,

    #[error("go_probability {0} is outside [0, 1]")]
    GoProbability(f64),

    #[error("min_interval_ms ({min}) exceeds max_interval_ms ({max})")]
    IntervalRange { min: u64, max: u64 },

    #[error("response_window_ms must be greater than zero")]
    ResponseWindow,

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Session timing and composition. Every field can be overridden from JSON;
/// missing fields fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub total_rounds: usize,
    pub go_probability: f64,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    pub response_window_ms: u64,
    /// Lead-in before the first pre-stimulus delay of a session.
    pub start_delay_ms: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            total_rounds: 20,
            go_probability: 0.7,
            min_interval_ms: 1500,
            max_interval_ms: 3000,
            response_window_ms: 1500,
            start_delay_ms: 1000,
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        if !self.go_probability.is_finite() || !(0.0..=1.0).contains(&self.go_probability) {
            return Err(ConfigError::GoProbability(self.go_probability));
        }
        if self.min_interval_ms > self.max_interval_ms {
            return Err(ConfigError::IntervalRange {
                min: self.min_interval_ms,
                max: self.max_interval_ms,
            });
        }
        if self.response_window_ms == 0 {
            return Err(ConfigError::ResponseWindow);
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Draws a pre-stimulus delay uniformly from `[min_interval_ms, max_interval_ms)`.
    pub fn pre_stimulus_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let ms = if self.min_interval_ms < self.max_interval_ms {
            rng.random_range(self.min_interval_ms..self.max_interval_ms)
        } else {
            self.min_interval_ms
        };
        Duration::from_millis(ms)
    }

    pub fn response_window(&self) -> Duration {
        Duration::from_millis(self.response_window_ms)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }
}
