//! Advanced-remote lane
//!
//! Unknown ids, replies echoed back at us and parameters of the wrong shape
//! are all ignored: this lane never answers with an error.

use bytes::Bytes;
use iap_core::{
    AirCommand, Command, Feedback, ItemRange, ItemSelection, ItemType, Packet, Parameters,
    PlaybackAction, RepeatMode, ResultCode, ShuffleMode, TimeStatus,
};
use tracing::{debug, info, warn};

use super::{IpodEmulator, Replies};

/// Fixed acknowledgement of the undocumented 0x0C query
const UNKNOWN_0D_PAYLOAD: [u8; 11] = [0; 11];

fn reply(command: AirCommand, parameters: Parameters) -> Vec<Packet> {
    vec![Packet::advanced(command, parameters)]
}

/// Narrow a raw item type; unknown types are logged
fn item_type(raw: u8, context: AirCommand) -> Option<ItemType> {
    match ItemType::try_from(raw) {
        Ok(item_type) => Some(item_type),
        Err(e) => {
            warn!(command = ?context, error = %e, "Unknown item type");
            None
        }
    }
}

fn ignore_malformed(command: AirCommand, parameters: &Parameters) -> Vec<Packet> {
    warn!(
        command = ?command,
        kind = parameters.kind(),
        "Ignoring command with unexpected parameters"
    );
    Vec::new()
}

impl IpodEmulator {
    pub(super) fn handle_advanced_remote(&self, command: &Command) -> Replies<'_> {
        let Ok(air) = AirCommand::from_id(command.id) else {
            debug!(
                command = format!("0x{:04X}", command.id),
                "Ignoring unknown advanced-remote command"
            );
            return Replies::none();
        };
        let params = &command.parameters;

        let packets = match (air, params) {
            // Identity and maintenance
            (AirCommand::Ping, _) => reply(AirCommand::Pong, Parameters::None),
            (AirCommand::GetFlag, _) => {
                let flag = self.state.read().flag;
                reply(AirCommand::ResFlag, Parameters::Int(flag))
            }
            (AirCommand::SetFlag, _) => self.set_flag(params),
            (AirCommand::GetUnknown0C, _) => {
                let payload = Bytes::from_static(&UNKNOWN_0D_PAYLOAD);
                debug!(payload = %hex::encode(&payload), "Answering maintenance query");
                reply(AirCommand::ResUnknown0D, Parameters::Raw(payload))
            }
            (AirCommand::GetDeviceType, _) => {
                let device_type = self.state.read().device_type;
                reply(AirCommand::ResDeviceType, Parameters::Int(device_type))
            }
            (AirCommand::GetDeviceName, _) => {
                let name = self.state.read().device_name.clone();
                reply(AirCommand::ResDeviceName, Parameters::Text(name))
            }
            (AirCommand::GetScreenSize, _) => {
                let screen = self.state.read().screen;
                reply(AirCommand::ResScreenSize, Parameters::ScreenSize(screen))
            }

            // Navigation
            (AirCommand::SwitchMainPlaylist, _) => {
                self.hooks.switch_main_playlist();
                Vec::new()
            }
            (AirCommand::SwitchItem, Parameters::Item(selection)) => {
                self.switch_item(selection);
                Vec::new()
            }
            (AirCommand::ExecPlaylistJump, Parameters::Int(position)) => {
                let playlist = self.state.read().target_playlist;
                self.hooks.execute_playlist_jump(playlist, *position);
                Vec::new()
            }
            (AirCommand::PlaylistJump, Parameters::Int(index)) => {
                self.hooks.jump_to_song(*index);
                Vec::new()
            }

            // Enumeration
            (AirCommand::GetItemCount, Parameters::Int(raw)) => {
                let count = u8::try_from(*raw)
                    .ok()
                    .and_then(|raw| item_type(raw, air))
                    .map_or(0, |item_type| self.hooks.item_count(item_type));
                reply(AirCommand::ResItemCount, Parameters::Int(count))
            }
            (AirCommand::GetItemNames, Parameters::ItemRange(range)) => {
                return self.item_names(range);
            }

            // Now playing
            (AirCommand::GetTimeStatus, _) => {
                let status = TimeStatus {
                    length_ms: self.hooks.track_length_ms(),
                    elapsed_ms: self.hooks.elapsed_time_ms(),
                    status: self.state.read().status,
                };
                reply(AirCommand::ResTimeStatus, Parameters::TimeStatus(status))
            }
            (AirCommand::GetPlaylistPosition, _) => {
                let position = self.hooks.playlist_position();
                reply(AirCommand::ResPlaylistPosition, Parameters::Int(position))
            }
            (AirCommand::GetPlaylistSize, _) => {
                let size = self.hooks.playlist_size();
                reply(AirCommand::ResPlaylistSize, Parameters::Int(size))
            }
            (AirCommand::GetSongTitle, Parameters::Int(number)) => {
                let title = self.hooks.item_name(ItemType::Song, *number);
                reply(AirCommand::ResSongTitle, Parameters::Text(title))
            }
            (AirCommand::GetSongArtist, Parameters::Int(number)) => {
                let artist = self.hooks.song_artist_name(*number);
                reply(AirCommand::ResSongArtist, Parameters::Text(artist))
            }
            (AirCommand::GetSongAlbum, Parameters::Int(number)) => {
                let album = self.hooks.song_album_name(*number);
                reply(AirCommand::ResSongAlbum, Parameters::Text(album))
            }
            (AirCommand::SetPollingMode, Parameters::Int(poll)) => {
                if *poll != 0 {
                    self.poller.start();
                } else {
                    self.poller.stop();
                }
                Vec::new()
            }

            // Playback
            (AirCommand::PlaybackControl, Parameters::Int(raw)) => {
                self.playback_control(*raw);
                Vec::new()
            }
            (AirCommand::GetShuffleMode, _) => {
                let shuffle = self.state.read().shuffle;
                reply(
                    AirCommand::ResShuffleMode,
                    Parameters::Int(u8::from(shuffle).into()),
                )
            }
            (AirCommand::SetShuffleMode, Parameters::Int(raw)) => {
                match u8::try_from(*raw).ok().and_then(|raw| ShuffleMode::try_from(raw).ok()) {
                    Some(mode) => self.state.write().shuffle = mode,
                    None => debug!(value = raw, "Ignoring out-of-range shuffle mode"),
                }
                Vec::new()
            }
            (AirCommand::GetRepeatMode, _) => {
                let repeat = self.state.read().repeat;
                reply(
                    AirCommand::ResRepeatMode,
                    Parameters::Int(u8::from(repeat).into()),
                )
            }
            (AirCommand::SetRepeatMode, Parameters::Int(raw)) => {
                match u8::try_from(*raw).ok().and_then(|raw| RepeatMode::try_from(raw).ok()) {
                    Some(mode) => self.state.write().repeat = mode,
                    None => debug!(value = raw, "Ignoring out-of-range repeat mode"),
                }
                Vec::new()
            }

            // Acknowledged by silence
            (AirCommand::UploadPicture | AirCommand::GetColorScreenInfo, _) => {
                debug!(command = ?air, "Ignoring unimplemented command");
                Vec::new()
            }

            // Right command, wrong parameter shape
            (
                AirCommand::SwitchItem
                | AirCommand::ExecPlaylistJump
                | AirCommand::PlaylistJump
                | AirCommand::GetItemCount
                | AirCommand::GetItemNames
                | AirCommand::GetSongTitle
                | AirCommand::GetSongArtist
                | AirCommand::GetSongAlbum
                | AirCommand::SetPollingMode
                | AirCommand::PlaybackControl
                | AirCommand::SetShuffleMode
                | AirCommand::SetRepeatMode,
                _,
            ) => ignore_malformed(air, params),

            // Replies and markers only the player sends
            (
                AirCommand::NotUnderstood
                | AirCommand::Feedback
                | AirCommand::Pong
                | AirCommand::ResFlag
                | AirCommand::ResUnknown0D
                | AirCommand::ResDeviceType
                | AirCommand::ResDeviceName
                | AirCommand::ResItemCount
                | AirCommand::ResItemName
                | AirCommand::ResTimeStatus
                | AirCommand::ResPlaylistPosition
                | AirCommand::ResSongTitle
                | AirCommand::ResSongArtist
                | AirCommand::ResSongAlbum
                | AirCommand::ResTimeElapsed
                | AirCommand::ResShuffleMode
                | AirCommand::ResRepeatMode
                | AirCommand::ResScreenSize
                | AirCommand::ResPlaylistSize
                | AirCommand::ResColorScreenInfo,
                _,
            ) => {
                debug!(command = ?air, "Ignoring reply received by player");
                Vec::new()
            }
        };
        packets.into()
    }

    /// Vendor flag write: only the two boolean encodings are accepted
    fn set_flag(&self, params: &Parameters) -> Vec<Packet> {
        let result = match params {
            Parameters::Int(value @ (0 | 1)) => {
                self.state.write().flag = *value;
                ResultCode::Success
            }
            _ => {
                debug!(kind = params.kind(), "Rejecting vendor flag value");
                ResultCode::Failure
            }
        };

        reply(
            AirCommand::Feedback,
            Parameters::Feedback(Feedback::new(AirCommand::SetFlag, result)),
        )
    }

    fn switch_item(&self, selection: &ItemSelection) {
        let Some(item_type) = item_type(selection.item_type, AirCommand::SwitchItem) else {
            return;
        };

        if item_type == ItemType::Playlist {
            // Latched until an explicit playlist jump
            self.state.write().target_playlist = selection.number;
        }
        self.hooks.switch_item(item_type, selection.number);
    }

    /// One reply per item, offsets `start..start + length`
    fn item_names(&self, range: &ItemRange) -> Replies<'_> {
        let Some(item_type) = item_type(range.item_type, AirCommand::GetItemNames) else {
            return Replies::none();
        };
        debug!(?item_type, start = range.start, length = range.length, "Listing item names");
        Replies::item_names(self, item_type, range.start, range.length)
    }

    fn playback_control(&self, raw: u32) {
        let Some(action) = u8::try_from(raw)
            .ok()
            .and_then(|raw| PlaybackAction::try_from(raw).ok())
        else {
            debug!(action = raw, "Ignoring unknown playback action");
            return;
        };

        info!(?action, "Playback control");
        let hooks = &self.hooks;
        match action {
            PlaybackAction::PlayPause => hooks.play_pause(),
            PlaybackAction::Stop => hooks.stop(),
            PlaybackAction::SkipForward => hooks.skip_forward(),
            PlaybackAction::SkipBackward => hooks.skip_backward(),
            PlaybackAction::FastForward => hooks.start_fast_forward(),
            PlaybackAction::Rewind => hooks.start_rewind(),
            PlaybackAction::StopSeek => hooks.stop_seek(),
        }
    }
}
