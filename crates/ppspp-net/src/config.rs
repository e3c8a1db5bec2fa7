//! Connector configuration.
//!
//! Resolution order: environment variables → config file → defaults,
//! following the same scheme as Summit's top-level configuration.
//!
//! Config file location:
//!   1. $PPSPP_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/ppspp/config.toml
//!   3. ~/.config/ppspp/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Tuning knobs for a [`Connector`](crate::connector::Connector).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Milliseconds to wait for a new endpoint before failing with
    /// [`NetError::ConnectTimeout`](crate::error::NetError::ConnectTimeout).
    /// `0` disables the timeout (spec Open Question: unbounded by default).
    pub connect_timeout_ms: u64,

    /// Soft cap on buffered-but-unread inbound datagrams per endpoint.
    /// `0` means effectively unbounded. This bounds memory, not delivery: a
    /// full queue blocks the endpoint's reader task rather than dropping
    /// datagrams, so a misbehaving consumer applies backpressure upstream
    /// instead of losing data silently.
    pub receive_queue_bound: u64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 0,
            receive_queue_bound: 0,
        }
    }
}

impl ConnectorConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_ms > 0).then(|| Duration::from_millis(self.connect_timeout_ms))
    }

    /// Channel capacity to hand to `tokio::sync::mpsc::channel`. A bound of
    /// `0` maps to a large-but-finite capacity rather than a genuinely
    /// unbounded channel, since tokio has no bounded/unbounded polymorphism
    /// without boxing; see [`crate::udp`].
    pub fn receive_channel_capacity(&self) -> usize {
        const EFFECTIVELY_UNBOUNDED: usize = 1_000_000;
        if self.receive_queue_bound == 0 {
            EFFECTIVELY_UNBOUNDED
        } else {
            self.receive_queue_bound as usize
        }
    }

    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadFailed(path.clone(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.clone(), e))?
        } else {
            ConnectorConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn file_path() -> PathBuf {
        std::env::var("PPSPP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("PPSPP_CONNECT_TIMEOUT_MS") {
            if let Ok(parsed) = v.parse() {
                self.connect_timeout_ms = parsed;
            }
        }
        if let Ok(v) = std::env::var("PPSPP_RECEIVE_QUEUE_BOUND") {
            if let Ok(parsed) = v.parse() {
                self.receive_queue_bound = parsed;
            }
        }
    }
}

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
        .join("ppspp")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
}
