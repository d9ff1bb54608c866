//! Accessory-side configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a [`RemoteClient`](crate::RemoteClient)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Reply timeout in milliseconds; also the lifetime of a queued reply
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Item-name retrieval waits this many timeouts for all replies
    #[serde(default = "default_item_names_timeout_factor")]
    pub item_names_timeout_factor: u32,
    /// Pause after a full pass over the queue finds nothing, in milliseconds
    #[serde(default = "default_idle_backoff_ms")]
    pub idle_backoff_ms: u64,
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_item_names_timeout_factor() -> u32 {
    4
}

fn default_idle_backoff_ms() -> u64 {
    50
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            item_names_timeout_factor: default_item_names_timeout_factor(),
            idle_backoff_ms: default_idle_backoff_ms(),
        }
    }
}

impl RemoteConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn item_names_timeout(&self) -> Duration {
        self.timeout() * self.item_names_timeout_factor
    }

    pub fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }
}
