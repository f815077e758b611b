//! Client-side session configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// How the session enters play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    /// Ready handshake, then countdown.
    #[default]
    Handshake,
    /// Ask the server to start the session unconditionally at load.
    Immediate,
}

/// Session tuning, loadable from a TOML file.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the game server.
    server_url: String,

    /// Liveness poll period in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    poll_interval_ms: u64,

    /// Countdown ticks before play begins.
    #[serde(default = "default_countdown_ticks")]
    countdown_ticks: u8,

    /// Length of one countdown tick in milliseconds.
    #[serde(default = "default_countdown_tick_ms")]
    countdown_tick_ms: u64,

    /// Consecutive poll failures tolerated before the session counts as lost.
    #[serde(default = "default_max_poll_failures")]
    max_poll_failures: u32,

    /// Entry path into play.
    #[serde(default)]
    entry: EntryMode,
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_countdown_ticks() -> u8 {
    3
}

fn default_countdown_tick_ms() -> u64 {
    1_000
}

fn default_max_poll_failures() -> u32 {
    3
}

impl ClientConfig {
    /// Creates a configuration with default timing against the given server.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            poll_interval_ms: default_poll_interval_ms(),
            countdown_ticks: default_countdown_ticks(),
            countdown_tick_ms: default_countdown_tick_ms(),
            max_poll_failures: default_max_poll_failures(),
            entry: EntryMode::default(),
        }
    }

    /// Overrides the entry path.
    pub fn with_entry(mut self, entry: EntryMode) -> Self {
        self.entry = entry;
        self
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!(path = %path.as_ref().display(), "loading config file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("failed to parse config: {e}")))?;

        info!(server_url = %config.server_url, "config loaded");
        Ok(config)
    }
}

/// Configuration error with caller location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error was raised.
    pub line: u32,
    /// Source file where the error was raised.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
