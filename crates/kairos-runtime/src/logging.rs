//! Logging setup
//!
//! Events report their transitions and deadline misses through `tracing`.
//! Binaries install a subscriber once with [`init_logging`]; `RUST_LOG`
//! takes precedence over the configured level.

use kairos_core::{KairosError, KairosResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Log output configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, e.g. "info" or "kairos_runtime=debug"
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LogConfig {
    fn filter(&self) -> KairosResult<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level)
                .map_err(|e| KairosError::Config(format!("log level {:?}: {}", self.level, e))),
        }
    }
}

/// Install the global subscriber. Returns `Ok(false)` if one was already set.
pub fn init_logging(config: &LogConfig) -> KairosResult<bool> {
    let filter = config.filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };
    Ok(installed)
}
