//! Configuration management for the workout session engine
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: FT__)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub timers: TimerConfig,
    #[serde(default)]
    pub cues: CueConfig,
}

/// Timer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// How often the host drives the timer hooks, in milliseconds
    pub tick_interval_ms: u64,
    /// Rest period assigned to newly added sets, in seconds
    pub default_breaktime_secs: u32,
}

/// Completion-cue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CueConfig {
    /// Pause/vibrate milliseconds handed to the haptics collaborator
    pub vibration_pattern: Vec<u64>,
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            vibration_pattern: vec![0, 300, 150, 300],
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timers: TimerConfig {
                tick_interval_ms: 1000,
                default_breaktime_secs: fittrack_shared::DEFAULT_BREAKTIME_SECS,
            },
            cues: CueConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with FT__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&EngineConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (FT__ prefix)
            // e.g., FT__TIMERS__TICK_INTERVAL_MS=500 sets timers.tick_interval_ms
            .add_source(config::Environment::with_prefix("FT").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.timers.tick_interval_ms, 1000);
        assert_eq!(config.timers.default_breaktime_secs, 30);
        assert!(!config.cues.vibration_pattern.is_empty());
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!EngineConfig::is_production());
    }
}
