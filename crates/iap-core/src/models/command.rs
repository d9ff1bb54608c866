//! Command identifiers per mode lane
//!
//! Each lane has a closed set of identifiers. Raw ids travel as `u32` in
//! [`Command`](super::Command); the `from_id` constructors narrow them back.

use crate::error::ProtocolError;

use super::OperatingMode;

/// Narrows a raw `u32` command id into a lane-specific enumeration
macro_rules! command_id {
    ($name:ident: $repr:ty) => {
        impl $name {
            /// Interpret a raw command id in this lane
            pub fn from_id(id: u32) -> Result<Self, ProtocolError> {
                let raw = <$repr>::try_from(id).map_err(|_| ProtocolError::UnknownValue {
                    kind: stringify!($name),
                    value: id,
                })?;
                Self::try_from(raw)
            }

            /// Raw command id as carried in a [`Command`](super::Command)
            pub fn id(self) -> u32 {
                u32::from(<$repr>::from(self))
            }
        }
    };
}

wire_enum! {
    /// Commands of the mode-switch lane
    pub enum SwitchCommand: u16 {
        SetVoiceRecorder = 0x0101,
        SetSimpleRemote = 0x0102,
        SetAdvancedRemote = 0x0104,
        GetMode = 0x0003,
        /// Alternate vendor encoding of the advanced-remote switch
        SetAdvancedRemoteAlt = 0x0005,
        /// Alternate vendor encoding of the simple-remote switch
        SetSimpleRemoteAlt = 0x0006,
        ResModeSwitch = 0x0400,
        ResModeVoiceRecorder = 0x0401,
        ResModeSimpleRemote = 0x0402,
        ResModeAdvancedRemote = 0x0404,
    }
}

command_id!(SwitchCommand: u16);

impl SwitchCommand {
    /// Mode this command switches the player into, if it is a switch command
    pub fn target_mode(self) -> Option<OperatingMode> {
        match self {
            SwitchCommand::SetVoiceRecorder => Some(OperatingMode::VoiceRecorder),
            SwitchCommand::SetSimpleRemote | SwitchCommand::SetSimpleRemoteAlt => {
                Some(OperatingMode::SimpleRemote)
            }
            SwitchCommand::SetAdvancedRemote | SwitchCommand::SetAdvancedRemoteAlt => {
                Some(OperatingMode::AdvancedRemote)
            }
            _ => None,
        }
    }

    /// Mode-status reply identifier for the given operating mode
    pub fn mode_status(mode: OperatingMode) -> Self {
        match mode {
            OperatingMode::ModeSwitch => SwitchCommand::ResModeSwitch,
            OperatingMode::VoiceRecorder => SwitchCommand::ResModeVoiceRecorder,
            OperatingMode::SimpleRemote => SwitchCommand::ResModeSimpleRemote,
            OperatingMode::AdvancedRemote => SwitchCommand::ResModeAdvancedRemote,
        }
    }

    /// Operating mode reported by a mode-status reply
    pub fn reported_mode(self) -> Option<OperatingMode> {
        match self {
            SwitchCommand::ResModeSwitch => Some(OperatingMode::ModeSwitch),
            SwitchCommand::ResModeVoiceRecorder => Some(OperatingMode::VoiceRecorder),
            SwitchCommand::ResModeSimpleRemote => Some(OperatingMode::SimpleRemote),
            SwitchCommand::ResModeAdvancedRemote => Some(OperatingMode::AdvancedRemote),
            _ => None,
        }
    }
}

wire_enum! {
    /// Buttons of the simple-remote lane
    ///
    /// Values are bit positions in the remote's button bitmap. Only single
    /// buttons are meaningful; combinations are not part of this vocabulary.
    pub enum RemoteButton: u32 {
        ButtonReleased = 0x0000_0000,
        PlayPause = 0x0000_0001,
        VolumeUp = 0x0000_0002,
        VolumeDown = 0x0000_0004,
        NextSong = 0x0000_0008,
        PrevSong = 0x0000_0010,
        NextAlbum = 0x0000_0020,
        PrevAlbum = 0x0000_0040,
        Stop = 0x0000_0080,
        Play = 0x0000_0100,
        Pause = 0x0000_0200,
        Mute = 0x0000_0400,
        NextPlaylist = 0x0000_2000,
        PrevPlaylist = 0x0000_4000,
        Shuffle = 0x0000_8000,
        Repeat = 0x0001_0000,
        PowerOff = 0x0004_0000,
        PowerOn = 0x0008_0000,
        Menu = 0x0040_0000,
        Select = 0x0080_0000,
        ScrollUp = 0x0100_0000,
        ScrollDown = 0x0200_0000,
    }
}

command_id!(RemoteButton: u32);

wire_enum! {
    /// Commands of the advanced-remote lane
    ///
    /// `GetUnknown0C`, `GetFlag`/`SetFlag` and `GetColorScreenInfo` are vendor
    /// maintenance codes whose meaning is not documented; only their wire
    /// shapes are known.
    pub enum AirCommand: u16 {
        /// Peer rejected a command id; carries the rejected id
        NotUnderstood = 0x0000,
        /// Generic result record for commands without a dedicated reply
        Feedback = 0x0001,
        Ping = 0x0002,
        Pong = 0x0003,
        GetFlag = 0x0009,
        ResFlag = 0x000A,
        SetFlag = 0x000B,
        GetUnknown0C = 0x000C,
        ResUnknown0D = 0x000D,
        GetDeviceType = 0x0012,
        ResDeviceType = 0x0013,
        GetDeviceName = 0x0014,
        ResDeviceName = 0x0015,
        SwitchMainPlaylist = 0x0016,
        SwitchItem = 0x0017,
        GetItemCount = 0x0018,
        ResItemCount = 0x0019,
        GetItemNames = 0x001A,
        ResItemName = 0x001B,
        GetTimeStatus = 0x001C,
        ResTimeStatus = 0x001D,
        GetPlaylistPosition = 0x001E,
        ResPlaylistPosition = 0x001F,
        GetSongTitle = 0x0020,
        ResSongTitle = 0x0021,
        GetSongArtist = 0x0022,
        ResSongArtist = 0x0023,
        GetSongAlbum = 0x0024,
        ResSongAlbum = 0x0025,
        SetPollingMode = 0x0026,
        /// Unsolicited elapsed-time broadcast while polling is enabled
        ResTimeElapsed = 0x0027,
        ExecPlaylistJump = 0x0028,
        PlaybackControl = 0x0029,
        GetShuffleMode = 0x002C,
        ResShuffleMode = 0x002D,
        SetShuffleMode = 0x002E,
        GetRepeatMode = 0x002F,
        ResRepeatMode = 0x0030,
        SetRepeatMode = 0x0031,
        UploadPicture = 0x0032,
        GetScreenSize = 0x0033,
        ResScreenSize = 0x0034,
        GetPlaylistSize = 0x0035,
        ResPlaylistSize = 0x0036,
        PlaylistJump = 0x0037,
        GetColorScreenInfo = 0x0038,
        ResColorScreenInfo = 0x0039,
    }
}

command_id!(AirCommand: u16);

impl AirCommand {
    /// Dedicated reply for a request, if the request has one
    ///
    /// Every pair listed here follows the `request + 1` numbering, but the
    /// table is authoritative: commands acknowledged through
    /// [`AirCommand::Feedback`] or not acknowledged at all return `None`.
    pub fn reply(self) -> Option<AirCommand> {
        use AirCommand::*;

        match self {
            Ping => Some(Pong),
            GetFlag => Some(ResFlag),
            GetUnknown0C => Some(ResUnknown0D),
            GetDeviceType => Some(ResDeviceType),
            GetDeviceName => Some(ResDeviceName),
            GetItemCount => Some(ResItemCount),
            GetItemNames => Some(ResItemName),
            GetTimeStatus => Some(ResTimeStatus),
            GetPlaylistPosition => Some(ResPlaylistPosition),
            GetSongTitle => Some(ResSongTitle),
            GetSongArtist => Some(ResSongArtist),
            GetSongAlbum => Some(ResSongAlbum),
            GetShuffleMode => Some(ResShuffleMode),
            GetRepeatMode => Some(ResRepeatMode),
            GetScreenSize => Some(ResScreenSize),
            GetPlaylistSize => Some(ResPlaylistSize),
            GetColorScreenInfo => Some(ResColorScreenInfo),
            _ => None,
        }
    }
}
