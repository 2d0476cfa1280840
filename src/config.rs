//! Application configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings shared by the relay, the terminal client and the opponent driver.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Delay before the computer opponent acts, in milliseconds.
    #[serde(default = "default_think_delay_ms")]
    think_delay_ms: u64,

    /// Seed for reproducible dice; random when absent.
    #[serde(default)]
    dice_seed: Option<u64>,

    /// Interface the relay binds to.
    #[serde(default = "default_relay_host")]
    relay_host: String,

    /// Port the relay listens on.
    #[serde(default = "default_relay_port")]
    relay_port: u16,

    /// WebSocket URL peers connect to.
    #[serde(default = "default_relay_url")]
    relay_url: String,
}

fn default_think_delay_ms() -> u64 {
    800
}

fn default_relay_host() -> String {
    "127.0.0.1".to_string()
}

fn default_relay_port() -> u16 {
    3000
}

fn default_relay_url() -> String {
    "ws://127.0.0.1:3000/ws".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            think_delay_ms: default_think_delay_ms(),
            dice_seed: None,
            relay_host: default_relay_host(),
            relay_port: default_relay_port(),
            relay_url: default_relay_url(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(think_delay_ms = config.think_delay_ms, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Think delay as a duration.
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    /// Overrides the dice seed.
    pub fn with_dice_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.dice_seed = seed;
        }
        self
    }

    /// Overrides the think delay.
    pub fn with_think_delay_ms(mut self, think_delay_ms: u64) -> Self {
        self.think_delay_ms = think_delay_ms;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
