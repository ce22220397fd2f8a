//! Simulation configuration
//!
//! Loaded from JSON, then optionally overridden from the environment:
//!
//! ```json
//! { "time_step": 0.01, "resolution": 4, "realtime": true,
//!   "max_idle": "5ms", "log": { "level": "debug", "json": false } }
//! ```

use std::path::Path;
use std::time::Duration;

use kairos_core::{KairosError, KairosResult, DEFAULT_RESOLUTION};
use kairos_time::ClockConfig;
use serde::{Deserialize, Serialize};

use crate::{LogConfig, DEFAULT_MAX_IDLE};

pub const ENV_TIME_STEP: &str = "KAIROS_TIME_STEP";
pub const ENV_RESOLUTION: &str = "KAIROS_RESOLUTION";
pub const ENV_REALTIME: &str = "KAIROS_REALTIME";
pub const ENV_MAX_IDLE: &str = "KAIROS_MAX_IDLE";

/// Full configuration of a simulation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub time_step: f64,
    pub resolution: u32,
    pub realtime: bool,
    pub start_time: f64,
    /// Longest sleep between real-time ticks, e.g. "5ms"
    #[serde(with = "duration_str")]
    pub max_idle: Duration,
    pub log: LogConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let clock = ClockConfig::default();
        SimulationConfig {
            time_step: clock.time_step,
            resolution: DEFAULT_RESOLUTION,
            realtime: clock.realtime,
            start_time: clock.start_time,
            max_idle: DEFAULT_MAX_IDLE,
            log: LogConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> KairosResult<Self> {
        let config: SimulationConfig =
            serde_json::from_str(json).map_err(|e| KairosError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> KairosResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| KairosError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> KairosResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| KairosError::Config(e.to_string()))
    }

    /// Apply `KAIROS_*` environment variables on top of this config
    pub fn apply_env_overrides(&mut self) -> KairosResult<()> {
        if let Some(v) = env_var(ENV_TIME_STEP) {
            self.time_step = parse_env(ENV_TIME_STEP, &v)?;
        }
        if let Some(v) = env_var(ENV_RESOLUTION) {
            self.resolution = parse_env(ENV_RESOLUTION, &v)?;
        }
        if let Some(v) = env_var(ENV_REALTIME) {
            self.realtime = match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(KairosError::Config(format!("{}={}", ENV_REALTIME, v))),
            };
        }
        if let Some(v) = env_var(ENV_MAX_IDLE) {
            self.max_idle = humantime::parse_duration(&v)
                .map_err(|e| KairosError::Config(format!("{}={}: {}", ENV_MAX_IDLE, v, e)))?;
        }
        self.validate()
    }

    pub fn validate(&self) -> KairosResult<()> {
        self.clock_config().validate()?;
        if self.max_idle.is_zero() {
            return Err(KairosError::Config("max_idle must be > 0".into()));
        }
        Ok(())
    }

    pub fn clock_config(&self) -> ClockConfig {
        ClockConfig {
            time_step: self.time_step,
            resolution: self.resolution,
            realtime: self.realtime,
            start_time: self.start_time,
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> KairosResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| KairosError::Config(format!("{}={}: {}", name, value, e)))
}

mod duration_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&humantime::format_duration(*d).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
