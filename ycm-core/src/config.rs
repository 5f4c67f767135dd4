//! Completer configuration.
//!
//! Loaded from a JSON file; every field has a default so a partial (or empty)
//! object is valid:
//!
//! ```json
//! { "min_worker_threads": 1, "max_worker_threads": 8,
//!   "max_candidate_length": 80, "max_results": 50, "log_filter": "info" }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleterConfig {
    /// Lower bound on scoring worker threads
    #[serde(default = "default_min_worker_threads")]
    pub min_worker_threads: usize,

    /// Upper bound on scoring worker threads
    #[serde(default = "default_max_worker_threads")]
    pub max_worker_threads: usize,

    /// Longer identifiers are stored as the empty candidate; 0 disables the cap
    #[serde(default = "default_max_candidate_length")]
    pub max_candidate_length: usize,

    /// Default number of ranked results returned to callers; 0 means all
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// `tracing` filter directive, e.g. `info` or `ycm_core=debug`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_min_worker_threads() -> usize {
    1
}

fn default_max_worker_threads() -> usize {
    8
}

fn default_max_candidate_length() -> usize {
    crate::repository::DEFAULT_MAX_CANDIDATE_LENGTH
}

fn default_max_results() -> usize {
    50
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for CompleterConfig {
    fn default() -> Self {
        Self {
            min_worker_threads: default_min_worker_threads(),
            max_worker_threads: default_max_worker_threads(),
            max_candidate_length: default_max_candidate_length(),
            max_results: default_max_results(),
            log_filter: default_log_filter(),
        }
    }
}

impl CompleterConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_worker_threads == 0 {
            return Err(ConfigError::Invalid("min_worker_threads must be at least 1".into()));
        }
        if self.min_worker_threads > self.max_worker_threads {
            return Err(ConfigError::Invalid(format!(
                "min_worker_threads ({}) exceeds max_worker_threads ({})",
                self.min_worker_threads, self.max_worker_threads
            )));
        }
        Ok(())
    }

    /// Worker count for a machine with `available` hardware threads.
    pub fn worker_threads(&self, available: usize) -> usize {
        available.clamp(self.min_worker_threads, self.max_worker_threads)
    }
}
