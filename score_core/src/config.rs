use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_SIMULATOR_CONFIG: &str = include_str!("data/simulator_config.json");

/// Environment variable naming a JSON file that replaces the builtin config.
pub const SIMULATOR_CONFIG_ENV: &str = "SCORE_SIM_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    live_interval_ms: u64,
    seed: Option<u64>,
    history_limit: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            live_interval_ms: 900,
            seed: None,
            history_limit: 64,
        }
    }
}

impl SimulatorConfig {
    pub fn builtin() -> Self {
        serde_json::from_str(BUILTIN_SIMULATOR_CONFIG)
            .expect("builtin simulator config should parse")
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimulatorConfigError> {
        let config: SimulatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, SimulatorConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|source| SimulatorConfigError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        SimulatorConfig::from_json_str(&contents)
    }

    /// Load from [`SIMULATOR_CONFIG_ENV`] when set, otherwise the builtin.
    pub fn from_env_or_builtin() -> Result<Self, SimulatorConfigError> {
        match env::var_os(SIMULATOR_CONFIG_ENV) {
            Some(path) if !path.is_empty() => SimulatorConfig::from_file(Path::new(&path)),
            _ => Ok(SimulatorConfig::builtin()),
        }
    }

    pub fn validate(&self) -> Result<(), SimulatorConfigError> {
        if self.live_interval_ms == 0 {
            return Err(SimulatorConfigError::Invalid {
                field: "live_interval_ms",
                reason: "must be greater than zero",
            });
        }
        if self.history_limit == 0 {
            return Err(SimulatorConfigError::Invalid {
                field: "history_limit",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    pub fn live_interval(&self) -> Duration {
        Duration::from_millis(self.live_interval_ms)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_live_interval(mut self, interval: Duration) -> Result<Self, SimulatorConfigError> {
        self.live_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self.validate()?;
        Ok(self)
    }
}

#[derive(Debug, Error)]
pub enum SimulatorConfigError {
    #[error("failed to parse simulator config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read simulator config from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid simulator config field {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
