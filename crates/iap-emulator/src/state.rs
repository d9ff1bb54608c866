//! Per-process player session state

use iap_core::{OperatingMode, PlaybackStatus, RepeatMode, ScreenSize, ShuffleMode};
use serde::{Deserialize, Serialize};

use crate::config::EmulatorConfig;

/// Mutable state of the emulated player
///
/// Created at startup and kept for the life of the emulator. Polling is not
/// part of it; the [`Poller`](crate::Poller) tracks that itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Changed only by switch commands in the mode-switch lane
    pub mode: OperatingMode,
    /// Vendor flag; only 0 and 1 are ever stored
    pub flag: u32,
    pub device_type: u32,
    pub device_name: String,
    pub status: PlaybackStatus,
    pub shuffle: ShuffleMode,
    pub repeat: RepeatMode,
    /// Playlist latched by the last playlist selection
    pub target_playlist: u32,
    pub screen: ScreenSize,
}

impl SessionState {
    pub fn from_config(config: &EmulatorConfig) -> Self {
        Self {
            mode: OperatingMode::default(),
            flag: 0,
            device_type: config.device_type,
            device_name: config.device_name.clone(),
            status: PlaybackStatus::default(),
            shuffle: ShuffleMode::default(),
            repeat: RepeatMode::default(),
            target_playlist: 0,
            screen: ScreenSize::from(&config.screen),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::from_config(&EmulatorConfig::default())
    }
}
