/// Runtime configuration.
///
/// Layered lowest to highest: built-in defaults, an optional JSON file, then
/// the `QPLAY_SEED`, `QPLAY_MAX_TRIALS` and `QPLAY_LOG` environment
/// variables. A present but unparsable variable is an error.
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_SEED: &str = "QPLAY_SEED";
pub const ENV_MAX_TRIALS: &str = "QPLAY_MAX_TRIALS";
pub const ENV_LOG: &str = "QPLAY_LOG";

/// Upper bound on trials per request unless configured otherwise.
pub const DEFAULT_MAX_TRIALS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Fixed RNG seed; `None` draws from the OS CSPRNG.
    pub seed: Option<u64>,
    /// Largest `n` the session runtime accepts for a trial batch.
    pub max_trials: usize,
    /// Default tracing directive when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_trials: DEFAULT_MAX_TRIALS,
            log_filter: "qplay=info".to_string(),
        }
    }
}

impl PlaygroundConfig {
    /// Read a JSON config file; absent keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_SEED) {
            let seed = raw.trim().parse::<u64>().map_err(|_| invalid_env(ENV_SEED, &raw))?;
            self.seed = Some(seed);
        }
        if let Some(raw) = lookup(ENV_MAX_TRIALS) {
            self.max_trials = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid_env(ENV_MAX_TRIALS, &raw))?;
        }
        if let Some(raw) = lookup(ENV_LOG) {
            self.log_filter = raw;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_trials == 0 {
            return Err(ConfigError::Invalid("max_trials must be at least 1".into()));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log_filter must not be empty".into()));
        }
        Ok(())
    }
}

fn invalid_env(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    }
}
