//! Protocol-fixed codes carried inside command parameters

use std::fmt;

wire_enum! {
    /// Result code of the generic feedback record
    pub enum ResultCode: u8 {
        Success = 0x00,
        Failure = 0x02,
        /// Parameter length exceeded what the command accepts
        BadLength = 0x04,
        /// A response id was sent where a command was expected
        ResponseGivenForCommand = 0x05,
    }
}

wire_enum! {
    /// Database item categories used for enumeration and navigation
    pub enum ItemType: u8 {
        Playlist = 0x01,
        Artist = 0x02,
        Album = 0x03,
        Genre = 0x04,
        Song = 0x05,
        Composer = 0x06,
    }
}

impl ItemType {
    pub const ALL: [ItemType; 6] = [
        ItemType::Playlist,
        ItemType::Artist,
        ItemType::Album,
        ItemType::Genre,
        ItemType::Song,
        ItemType::Composer,
    ];

    /// Human-readable label, also used for placeholder item names
    pub fn label(self) -> &'static str {
        match self {
            ItemType::Playlist => "Playlist",
            ItemType::Artist => "Artist",
            ItemType::Album => "Album",
            ItemType::Genre => "Genre",
            ItemType::Song => "Song",
            ItemType::Composer => "Composer",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

wire_enum! {
    /// Action codes of the advanced-remote playback control command
    pub enum PlaybackAction: u8 {
        PlayPause = 0x01,
        Stop = 0x02,
        SkipForward = 0x03,
        SkipBackward = 0x04,
        FastForward = 0x05,
        Rewind = 0x06,
        /// Ends a fast-forward or rewind
        StopSeek = 0x07,
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum ShuffleMode: u8 {
        #[default]
        Off = 0x00,
        Songs = 0x01,
        Albums = 0x02,
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum RepeatMode: u8 {
        #[default]
        Off = 0x00,
        Song = 0x01,
        Album = 0x02,
    }
}

wire_enum! {
    /// Playback status reported in the time-status record
    #[derive(Default)]
    pub enum PlaybackStatus: u8 {
        #[default]
        Stopped = 0x00,
        Playing = 0x01,
        Paused = 0x02,
    }
}

/// Device type identifiers reported by the device-type query
pub mod device_type {
    pub const GEN3: u32 = 0x0003;
    pub const GEN4: u32 = 0x0004;
    pub const GEN5_30GB: u32 = 0x000B;
    pub const GEN5_60GB: u32 = 0x000C;
    pub const NANO: u32 = 0x0010;
}
