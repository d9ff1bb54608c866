//! Host capability interface
//!
//! The emulator knows the protocol but nothing about the media library or
//! the playback engine behind it. Hosts implement [`PlayerHooks`] to supply
//! both; every method has a default returning a protocol-legal placeholder,
//! so an implementation only overrides what it actually backs.
//!
//! Hooks are called synchronously on the dispatch path (and for
//! [`PlayerHooks::elapsed_time_ms`] also from the poll task), so they must
//! not block for long.

use iap_core::ItemType;

/// Media library and playback hooks
#[cfg_attr(test, mockall::automock)]
pub trait PlayerHooks: Send + Sync {
    // =========================================================================
    // Library
    // =========================================================================

    /// Name of item `number` of the given type
    fn item_name(&self, item_type: ItemType, number: u32) -> String {
        format!("{} {}", item_type.label(), number)
    }

    /// Number of items of the given type
    fn item_count(&self, _item_type: ItemType) -> u32 {
        0
    }

    fn song_artist_name(&self, number: u32) -> String {
        format!("Song {} Artist Name", number)
    }

    fn song_album_name(&self, number: u32) -> String {
        format!("Song {} Album Name", number)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switch to the playlist containing all songs
    fn switch_main_playlist(&self) {}

    /// Make item `number` of the given type active
    ///
    /// Selecting a playlist only latches it; playback starts with
    /// [`PlayerHooks::execute_playlist_jump`].
    fn switch_item(&self, _item_type: ItemType, _number: u32) {}

    /// Start the latched `playlist` at `position`
    fn execute_playlist_jump(&self, _playlist: u32, _position: u32) {}

    /// Jump to a song by absolute index in the current playlist
    fn jump_to_song(&self, _index: u32) {}

    // =========================================================================
    // Now playing
    // =========================================================================

    /// Index of the current track in the current playlist
    fn playlist_position(&self) -> u32 {
        0
    }

    /// Number of tracks in the current playlist
    fn playlist_size(&self) -> u32 {
        0
    }

    fn track_length_ms(&self) -> u32 {
        0
    }

    fn elapsed_time_ms(&self) -> u32 {
        0
    }

    // =========================================================================
    // Playback actions, shared by both remote lanes
    // =========================================================================

    fn play_pause(&self) {}
    fn stop(&self) {}
    fn skip_forward(&self) {}
    fn skip_backward(&self) {}
    fn start_fast_forward(&self) {}
    fn start_rewind(&self) {}
    fn stop_seek(&self) {}

    // =========================================================================
    // Simple-remote buttons without an advanced equivalent
    // =========================================================================

    fn button_released(&self) {}
    fn play(&self) {}
    fn pause(&self) {}
    fn volume_up(&self) {}
    fn volume_down(&self) {}
    fn next_album(&self) {}
    fn prev_album(&self) {}
    fn mute(&self) {}
    fn next_playlist(&self) {}
    fn prev_playlist(&self) {}
    fn toggle_shuffle(&self) {}
    fn toggle_repeat(&self) {}
    fn power_off(&self) {}
    fn power_on(&self) {}
    fn menu(&self) {}
    fn select(&self) {}
    fn scroll_up(&self) {}
    fn scroll_down(&self) {}
}

/// Placeholder hooks: generated names, empty library, no-op actions
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl PlayerHooks for DefaultHooks {}
