use config::{ConfigError, Environment};
use risk_core::{DecisionThresholds, EngineConfig, ReplayConfig};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub decision: DecisionThresholds,
    pub replay: ReplayConfig,
    pub events: EventsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventsConfig {
    pub capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            // Server defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8091)?
            .set_default("server.workers", 4)?
            // Velocity / correlation windows and thresholds
            .set_default("engine.ip_window_ms", 10_000)?
            .set_default("engine.ip_high_threshold", 5)?
            .set_default("engine.ip_extreme_threshold", 15)?
            .set_default("engine.device_window_ms", 10_000)?
            .set_default("engine.device_high_threshold", 8)?
            .set_default("engine.correlation_window_ms", 60_000)?
            .set_default("engine.device_max_ips", 3)?
            .set_default("engine.ip_max_devices", 5)?
            .set_default("engine.max_tracked_keys", 50_000)?
            // Decision bands
            .set_default("decision.allow_max", 20)?
            .set_default("decision.captcha_max", 50)?
            .set_default("decision.block_max", 80)?
            // Replay cache
            .set_default("replay.window_ms", 300_000)?
            .set_default("replay.max_entries", 10_000)?
            // Event feed
            .set_default("events.capacity", 100)?;

        builder = builder.add_source(Environment::with_prefix("GATEWAY").separator("__"));

        // Override from environment variables
        if let Ok(port) = env::var("SERVICE_PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize()
    }
}
