//! Configuration loading from TOML.
//!
//! Reads `config.toml` from the working directory and deserializes it
//! into strongly-typed structs. Every section and field carries a
//! default, so a missing or partial file still yields a runnable
//! configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub simulation: SimulationLimits,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationLimits {
    /// Hard ceiling on rounds accepted per request.
    pub max_rounds: u32,
    /// Rounds used when a request does not say.
    pub default_rounds: u32,
    /// Upper bound applied to drawn crash multipliers.
    pub multiplier_cap: f64,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        SimulationLimits {
            max_rounds: 100_000,
            default_rounds: 1_000,
            multiplier_cap: 1_000.0,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults
    /// when the file does not exist.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!(path, "No config file found, using defaults");
            return Ok(AppConfig::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
