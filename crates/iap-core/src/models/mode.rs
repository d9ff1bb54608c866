//! Mode lanes and the player's operating mode

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

wire_enum! {
    /// Lane a packet travels in
    ///
    /// Every packet is tagged with one of these. Mode-switch and mode-status
    /// packets have their own lanes, so the player can always receive them
    /// regardless of its current operating mode.
    pub enum Mode: u8 {
        ModeSwitch = 0x00,
        VoiceRecorder = 0x01,
        SimpleRemote = 0x02,
        RequestModeStatus = 0x03,
        AdvancedRemote = 0x04,
    }
}

/// Mode the player is currently operating in
///
/// The player is always in exactly one of these. `RequestModeStatus` is a
/// lane only and never a state, hence the separate type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingMode {
    #[default]
    ModeSwitch,
    VoiceRecorder,
    SimpleRemote,
    AdvancedRemote,
}

impl From<OperatingMode> for Mode {
    fn from(mode: OperatingMode) -> Self {
        match mode {
            OperatingMode::ModeSwitch => Mode::ModeSwitch,
            OperatingMode::VoiceRecorder => Mode::VoiceRecorder,
            OperatingMode::SimpleRemote => Mode::SimpleRemote,
            OperatingMode::AdvancedRemote => Mode::AdvancedRemote,
        }
    }
}

impl TryFrom<Mode> for OperatingMode {
    type Error = ProtocolError;

    fn try_from(mode: Mode) -> Result<Self, Self::Error> {
        match mode {
            Mode::ModeSwitch => Ok(OperatingMode::ModeSwitch),
            Mode::VoiceRecorder => Ok(OperatingMode::VoiceRecorder),
            Mode::SimpleRemote => Ok(OperatingMode::SimpleRemote),
            Mode::AdvancedRemote => Ok(OperatingMode::AdvancedRemote),
            Mode::RequestModeStatus => Err(ProtocolError::NotOperatingMode(mode.into())),
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperatingMode::ModeSwitch => "mode-switch",
            OperatingMode::VoiceRecorder => "voice-recorder",
            OperatingMode::SimpleRemote => "simple-remote",
            OperatingMode::AdvancedRemote => "advanced-remote",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match OperatingMode::try_from(*self) {
            Ok(mode) => fmt::Display::fmt(&mode, f),
            Err(_) => f.write_str("request-mode-status"),
        }
    }
}
