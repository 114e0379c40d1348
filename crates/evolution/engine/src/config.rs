//! Configuration for the evolution engine

use crate::error::EngineError;
use evolution_controller::ControllerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable prefix, e.g. `EVOLUTION_LOOP__INTERVAL_MS=5000`.
pub const ENV_PREFIX: &str = "EVOLUTION";

/// Main engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Mutation limits
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Evaluation loop timing
    #[serde(default, rename = "loop")]
    pub evaluation: LoopConfig,

    /// Analytics export
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Evaluation loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Milliseconds between evaluations
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Trailing-edge debounce for emitted events
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Yield to the runtime before arming the first evaluation
    #[serde(default = "default_true")]
    pub defer_until_idle: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            debounce_ms: default_debounce_ms(),
            defer_until_idle: true,
        }
    }
}

impl LoopConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Analytics configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Flush target; nothing is sent when unset
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_interval_ms() -> u64 {
    30_000
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineConfig {
    /// Load configuration: defaults, then an optional file, then
    /// `EVOLUTION_*` environment variables (`__` between nested keys).
    pub fn load(path: Option<&str>) -> Result<Self, EngineError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&EngineConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.evaluation.interval_ms == 0 {
            return Err(EngineError::Config("loop.interval_ms must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.controller.stability_floor) {
            return Err(EngineError::Config(
                "controller.stability_floor must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}
