//! Configuration for logic-lab.
//!
//! Configuration is assembled from, in priority order:
//! 1. Command-line flags (applied by the binary)
//! 2. Environment variables (`LOGIC_LAB_POLICY`, `LOGIC_LAB_MAX_CYCLES`)
//! 3. A JSON config file passed with `--config`
//! 4. Built-in defaults
//!
//! # Config File Format
//!
//! ```json
//! {
//!   "policy": "strict",
//!   "max_cycles": 256
//! }
//! ```

use crate::policy::{InputPolicy, PolicyParseError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{event, Level};

/// Environment variable selecting the input policy.
pub const ENV_POLICY: &str = "LOGIC_LAB_POLICY";

/// Environment variable overriding the cycle limit.
pub const ENV_MAX_CYCLES: &str = "LOGIC_LAB_MAX_CYCLES";

/// Default cycle limit for `run`.
pub const DEFAULT_MAX_CYCLES: u64 = 1_000;

/// logic-lab configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// How over-wide values and oversized programs are handled.
    pub policy: InputPolicy,

    /// Upper bound on instructions executed by a single `run`.
    /// Programs without HLT wrap around memory forever.
    pub max_cycles: u64,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            policy: InputPolicy::default(),
            max_cycles: DEFAULT_MAX_CYCLES,
        }
    }
}

impl LabConfig {
    /// Parse a configuration from JSON text. Missing fields take defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_json_str(&text)?;
        event!(Level::DEBUG, "Loaded configuration from {}: {:?}", path.as_ref().display(), config);
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(
            std::env::var(ENV_POLICY).ok().as_deref(),
            std::env::var(ENV_MAX_CYCLES).ok().as_deref(),
        )
    }

    /// Apply overrides given as raw strings (as read from the environment).
    pub fn apply_overrides(
        &mut self,
        policy: Option<&str>,
        max_cycles: Option<&str>,
    ) -> Result<(), ConfigError> {
        if let Some(policy) = policy {
            self.policy = policy.parse()?;
        }
        if let Some(raw) = max_cycles {
            self.max_cycles = raw.trim().parse()
                .map_err(|_| ConfigError::InvalidMaxCycles(raw.to_string()))?;
        }
        Ok(())
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("invalid config file: {0}")]
    Parse(String),

    #[error(transparent)]
    Policy(#[from] PolicyParseError),

    #[error("invalid cycle limit '{0}'")]
    InvalidMaxCycles(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}
