//! Emulator configuration
//!
//! Identity the player reports to the accessory, plus poll timing.

use std::path::Path;
use std::time::Duration;

use iap_core::{device_type, ScreenSize};
use serde::{Deserialize, Serialize};

/// Complete emulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmulatorConfig {
    /// Reported device type; see [`iap_core::device_type`]
    #[serde(default = "default_device_type")]
    pub device_type: u32,

    /// Reported device name
    #[serde(default = "default_device_name")]
    pub device_name: String,

    #[serde(default)]
    pub screen: ScreenConfig,

    /// Interval between elapsed-time broadcasts while polling
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_device_type() -> u32 {
    device_type::GEN5_30GB
}

fn default_device_name() -> String {
    "iPod".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            device_type: default_device_type(),
            device_name: default_device_name(),
            screen: ScreenConfig::default(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl EmulatorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Reported screen dimensions in pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    #[serde(default = "default_screen_width")]
    pub width: u16,
    #[serde(default = "default_screen_height")]
    pub height: u16,
}

fn default_screen_width() -> u16 {
    310
}

fn default_screen_height() -> u16 {
    168
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: default_screen_width(),
            height: default_screen_height(),
        }
    }
}

impl From<&ScreenConfig> for ScreenSize {
    fn from(screen: &ScreenConfig) -> Self {
        ScreenSize {
            width: screen.width,
            height: screen.height,
        }
    }
}
