//! Accessory-side command surface

use std::sync::Arc;

use bytes::Bytes;
use iap_core::{
    AirCommand, ItemRange, ItemSelection, ItemType, OperatingMode, Packet, PacketTransport,
    Parameters, PlaybackAction, RemoteButton, RepeatMode, ScreenSize, ShuffleMode, SwitchCommand,
    TimeStatus,
};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::RemoteConfig;
use crate::correlation::ReplyQueue;
use crate::error::{CommandError, CommandResult};

/// Issues commands to a player and correlates its replies
///
/// Creating a client spawns a listener task feeding inbound packets from the
/// transport into the reply queue, so it must be created inside a tokio
/// runtime. The task is aborted when the client is dropped.
pub struct RemoteClient {
    transport: Arc<dyn PacketTransport>,
    config: RemoteConfig,
    queue: Arc<ReplyQueue>,

    /// Background listener task handle
    listener_handle: Mutex<Option<JoinHandle<()>>>,
}

impl RemoteClient {
    pub fn new(transport: Arc<dyn PacketTransport>, config: RemoteConfig) -> Self {
        let queue = Arc::new(ReplyQueue::new(&config));

        let client = Self {
            transport,
            config,
            queue,
            listener_handle: Mutex::new(None),
        };
        client.start_listener();
        client
    }

    fn start_listener(&self) {
        let mut incoming_rx = self.transport.subscribe();
        let queue = self.queue.clone();

        let handle = tokio::spawn(async move {
            loop {
                match incoming_rx.recv().await {
                    Ok(packet) => queue.on_packet_received(packet),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "Inbound packet listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("Inbound packet channel closed");
                        break;
                    }
                }
            }
        });

        *self.listener_handle.lock() = Some(handle);
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Inbound hook, for hosts that deliver packets themselves
    pub fn on_packet_received(&self, packet: Packet) {
        self.queue.on_packet_received(packet);
    }

    /// Elapsed-time broadcasts (milliseconds) while polling is enabled
    pub fn poll_updates(&self) -> broadcast::Receiver<u32> {
        self.queue.poll_updates()
    }

    pub async fn is_connected(&self) -> bool {
        self.transport.is_connected().await
    }

    /// Send an advanced-remote command
    ///
    /// With `wait` false this returns `Parameters::None` as soon as the packet
    /// is handed to the transport. Otherwise it blocks until the reply is
    /// classified or the timeout passes.
    pub async fn send_command(
        &self,
        command: AirCommand,
        parameters: Parameters,
        wait: bool,
    ) -> CommandResult<Parameters> {
        let packet = Packet::advanced(command, parameters);
        debug!(%packet, wait, "Sending command");
        self.transport.send_packet(packet).await?;

        if !wait {
            return Ok(Parameters::None);
        }
        self.queue.wait_for_reply(command).await
    }

    async fn request(&self, command: AirCommand, parameters: Parameters) -> CommandResult<Parameters> {
        self.send_command(command, parameters, true).await
    }

    async fn notify(&self, command: AirCommand, parameters: Parameters) -> CommandResult<()> {
        self.send_command(command, parameters, false).await.map(|_| ())
    }

    async fn request_int(&self, command: AirCommand, parameters: Parameters) -> CommandResult<u32> {
        match self.request(command, parameters).await? {
            Parameters::Int(value) => Ok(value),
            other => Err(unexpected(command, &other)),
        }
    }

    async fn request_text(&self, command: AirCommand, parameters: Parameters) -> CommandResult<String> {
        match self.request(command, parameters).await? {
            Parameters::Text(text) => Ok(text),
            other => Err(unexpected(command, &other)),
        }
    }

    // =========================================================================
    // Identity and maintenance
    // =========================================================================

    pub async fn ping(&self) -> CommandResult<()> {
        self.request(AirCommand::Ping, Parameters::None).await.map(|_| ())
    }

    /// Read the vendor flag (meaning undocumented)
    pub async fn get_flag(&self) -> CommandResult<u32> {
        self.request_int(AirCommand::GetFlag, Parameters::None).await
    }

    /// Write the vendor flag; the player accepts only 0 and 1
    pub async fn set_flag(&self, value: u32) -> CommandResult<()> {
        self.request(AirCommand::SetFlag, Parameters::Int(value))
            .await
            .map(|_| ())
    }

    /// Undocumented maintenance query; returns the opaque acknowledgement
    pub async fn query_unknown_0c(&self) -> CommandResult<Bytes> {
        let command = AirCommand::GetUnknown0C;
        match self.request(command, Parameters::None).await? {
            Parameters::Raw(payload) => Ok(payload),
            other => Err(unexpected(command, &other)),
        }
    }

    pub async fn device_type(&self) -> CommandResult<u32> {
        self.request_int(AirCommand::GetDeviceType, Parameters::None).await
    }

    pub async fn device_name(&self) -> CommandResult<String> {
        self.request_text(AirCommand::GetDeviceName, Parameters::None).await
    }

    /// Request color screen information; no reply is awaited
    pub async fn color_screen_info(&self) -> CommandResult<()> {
        self.notify(AirCommand::GetColorScreenInfo, Parameters::None).await
    }

    pub async fn screen_size(&self) -> CommandResult<ScreenSize> {
        let command = AirCommand::GetScreenSize;
        match self.request(command, Parameters::None).await? {
            Parameters::ScreenSize(size) => Ok(size),
            other => Err(unexpected(command, &other)),
        }
    }

    pub async fn upload_picture(&self, _picture: &[u8]) -> CommandResult<()> {
        Err(CommandError::Unsupported("picture upload".to_string()))
    }

    // =========================================================================
    // Navigation and enumeration
    // =========================================================================

    /// Switch to the playlist containing all songs
    pub async fn switch_main_playlist(&self) -> CommandResult<()> {
        self.notify(AirCommand::SwitchMainPlaylist, Parameters::None).await
    }

    pub async fn switch_item(&self, item_type: ItemType, number: u32) -> CommandResult<()> {
        let selection = ItemSelection {
            item_type: item_type.into(),
            number,
        };
        self.notify(AirCommand::SwitchItem, Parameters::Item(selection)).await
    }

    pub async fn item_count(&self, item_type: ItemType) -> CommandResult<u32> {
        self.request_int(
            AirCommand::GetItemCount,
            Parameters::Int(u8::from(item_type).into()),
        )
        .await
    }

    /// Names of `count` items starting at `start`, in index order
    ///
    /// The player answers with one packet per item; this waits up to
    /// `item_names_timeout_factor` timeouts for all of them.
    pub async fn item_names(
        &self,
        item_type: ItemType,
        start: u32,
        count: u32,
    ) -> CommandResult<Vec<String>> {
        let range = ItemRange {
            item_type: item_type.into(),
            start,
            length: count,
        };
        self.notify(AirCommand::GetItemNames, Parameters::ItemRange(range))
            .await?;

        self.queue
            .collect_named_items(count as usize, self.config.item_names_timeout())
            .await
    }

    pub async fn playlist_position(&self) -> CommandResult<u32> {
        self.request_int(AirCommand::GetPlaylistPosition, Parameters::None)
            .await
    }

    pub async fn playlist_size(&self) -> CommandResult<u32> {
        self.request_int(AirCommand::GetPlaylistSize, Parameters::None)
            .await
    }

    /// Jump to a song by absolute index in the current playlist
    pub async fn jump_to_song(&self, index: u32) -> CommandResult<()> {
        self.notify(AirCommand::PlaylistJump, Parameters::Int(index)).await
    }

    /// Start playback of the latched playlist at `position`
    pub async fn execute_playlist_jump(&self, position: u32) -> CommandResult<()> {
        self.notify(AirCommand::ExecPlaylistJump, Parameters::Int(position))
            .await
    }

    // =========================================================================
    // Now playing
    // =========================================================================

    pub async fn time_status(&self) -> CommandResult<TimeStatus> {
        let command = AirCommand::GetTimeStatus;
        match self.request(command, Parameters::None).await? {
            Parameters::TimeStatus(status) => Ok(status),
            other => Err(unexpected(command, &other)),
        }
    }

    pub async fn song_title(&self, index: u32) -> CommandResult<String> {
        self.request_text(AirCommand::GetSongTitle, Parameters::Int(index))
            .await
    }

    pub async fn song_artist(&self, index: u32) -> CommandResult<String> {
        self.request_text(AirCommand::GetSongArtist, Parameters::Int(index))
            .await
    }

    pub async fn song_album(&self, index: u32) -> CommandResult<String> {
        self.request_text(AirCommand::GetSongAlbum, Parameters::Int(index))
            .await
    }

    /// Enable or disable elapsed-time broadcasts; see [`Self::poll_updates`]
    pub async fn set_polling_mode(&self, enabled: bool) -> CommandResult<()> {
        self.notify(AirCommand::SetPollingMode, Parameters::Int(enabled.into()))
            .await
    }

    // =========================================================================
    // Playback control
    // =========================================================================

    pub async fn playback_control(&self, action: PlaybackAction) -> CommandResult<()> {
        self.notify(
            AirCommand::PlaybackControl,
            Parameters::Int(u8::from(action).into()),
        )
        .await
    }

    pub async fn play_pause(&self) -> CommandResult<()> {
        self.playback_control(PlaybackAction::PlayPause).await
    }

    pub async fn stop(&self) -> CommandResult<()> {
        self.playback_control(PlaybackAction::Stop).await
    }

    pub async fn skip_forward(&self) -> CommandResult<()> {
        self.playback_control(PlaybackAction::SkipForward).await
    }

    pub async fn skip_backward(&self) -> CommandResult<()> {
        self.playback_control(PlaybackAction::SkipBackward).await
    }

    pub async fn start_fast_forward(&self) -> CommandResult<()> {
        self.playback_control(PlaybackAction::FastForward).await
    }

    pub async fn start_rewind(&self) -> CommandResult<()> {
        self.playback_control(PlaybackAction::Rewind).await
    }

    pub async fn stop_seek(&self) -> CommandResult<()> {
        self.playback_control(PlaybackAction::StopSeek).await
    }

    pub async fn shuffle_mode(&self) -> CommandResult<ShuffleMode> {
        let raw = self
            .request_int(AirCommand::GetShuffleMode, Parameters::None)
            .await?;
        Ok(ShuffleMode::try_from(narrow(AirCommand::GetShuffleMode, raw)?)?)
    }

    pub async fn set_shuffle_mode(&self, mode: ShuffleMode) -> CommandResult<()> {
        self.notify(
            AirCommand::SetShuffleMode,
            Parameters::Int(u8::from(mode).into()),
        )
        .await
    }

    pub async fn repeat_mode(&self) -> CommandResult<RepeatMode> {
        let raw = self
            .request_int(AirCommand::GetRepeatMode, Parameters::None)
            .await?;
        Ok(RepeatMode::try_from(narrow(AirCommand::GetRepeatMode, raw)?)?)
    }

    pub async fn set_repeat_mode(&self, mode: RepeatMode) -> CommandResult<()> {
        self.notify(
            AirCommand::SetRepeatMode,
            Parameters::Int(u8::from(mode).into()),
        )
        .await
    }

    // =========================================================================
    // Mode lanes
    // =========================================================================

    /// Ask the player to switch operating mode
    ///
    /// The player does not acknowledge switches; use [`Self::query_mode`] to
    /// confirm.
    pub async fn enter_mode(&self, mode: OperatingMode) -> CommandResult<()> {
        let command = match mode {
            OperatingMode::VoiceRecorder => SwitchCommand::SetVoiceRecorder,
            OperatingMode::SimpleRemote => SwitchCommand::SetSimpleRemote,
            OperatingMode::AdvancedRemote => SwitchCommand::SetAdvancedRemote,
            OperatingMode::ModeSwitch => {
                return Err(CommandError::Unsupported(format!("switching to {}", mode)))
            }
        };

        info!(%mode, "Requesting mode switch");
        self.transport.send_packet(Packet::switch(command)).await?;
        Ok(())
    }

    /// Current operating mode of the player
    pub async fn query_mode(&self) -> CommandResult<OperatingMode> {
        self.transport
            .send_packet(Packet::switch(SwitchCommand::GetMode))
            .await?;
        self.queue.wait_for_mode_status().await
    }

    /// Press and release a simple-remote button
    pub async fn press_button(&self, button: RemoteButton) -> CommandResult<()> {
        self.transport.send_packet(Packet::button(button)).await?;
        if button != RemoteButton::ButtonReleased {
            self.transport
                .send_packet(Packet::button(RemoteButton::ButtonReleased))
                .await?;
        }
        Ok(())
    }
}

impl Drop for RemoteClient {
    fn drop(&mut self) {
        if let Some(handle) = self.listener_handle.get_mut().take() {
            handle.abort();
        }
    }
}

fn unexpected(command: AirCommand, parameters: &Parameters) -> CommandError {
    CommandError::UnexpectedReply {
        command: command.id(),
        kind: parameters.kind(),
    }
}

fn narrow(command: AirCommand, raw: u32) -> CommandResult<u8> {
    u8::try_from(raw).map_err(|_| CommandError::UnexpectedReply {
        command: command.id(),
        kind: "int",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use iap_core::{Feedback, MockConfig, MockTransport, Mode, ResultCode};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn client() -> (RemoteClient, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new(&MockConfig::default()));
        let client = RemoteClient::new(transport.clone(), RemoteConfig::default());
        (client, transport)
    }

    /// Inject `reply` once the client has sent something
    fn reply_after_send(transport: &Arc<MockTransport>, reply: Packet) {
        let transport = transport.clone();
        tokio::spawn(async move {
            while transport.sent_count() == 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            transport.inject_incoming(reply);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_and_forget_sends_one_packet() {
        let (client, transport) = client();

        client.switch_item(ItemType::Album, 4).await.unwrap();

        assert_eq!(
            transport.sent(),
            vec![Packet::advanced(
                AirCommand::SwitchItem,
                Parameters::Item(ItemSelection {
                    item_type: 0x03,
                    number: 4
                })
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_device_name_round_trip() {
        let (client, transport) = client();
        reply_after_send(
            &transport,
            Packet::advanced(AirCommand::ResDeviceName, Parameters::Text("Car Dock".into())),
        );

        assert_eq!(client.device_name().await.unwrap(), "Car Dock");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_reply_shape() {
        let (client, transport) = client();
        reply_after_send(
            &transport,
            Packet::advanced(AirCommand::ResPlaylistSize, Parameters::Text("x".into())),
        );

        assert_eq!(
            client.playlist_size().await,
            Err(CommandError::UnexpectedReply {
                command: 0x35,
                kind: "text"
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_flag_failure_feedback() {
        let (client, transport) = client();
        reply_after_send(
            &transport,
            Packet::advanced(
                AirCommand::Feedback,
                Parameters::Feedback(Feedback::new(AirCommand::SetFlag, ResultCode::Failure)),
            ),
        );

        let err = client.set_flag(7).await.unwrap_err();
        assert!(err.is_failure());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shuffle_mode_out_of_range() {
        let (client, transport) = client();
        reply_after_send(
            &transport,
            Packet::advanced(AirCommand::ResShuffleMode, Parameters::Int(9)),
        );

        assert!(matches!(
            client.shuffle_mode().await,
            Err(CommandError::Protocol(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_press_button_releases() {
        let (client, transport) = client();

        client.press_button(RemoteButton::VolumeUp).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|p| p.mode == Mode::SimpleRemote));
        assert_eq!(sent[0].command.id, 0x02);
        assert_eq!(sent[1].command.id, 0x00);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_mode_switch_lane_is_rejected() {
        let (client, transport) = client();

        assert!(matches!(
            client.enter_mode(OperatingMode::ModeSwitch).await,
            Err(CommandError::Unsupported(_))
        ));
        assert_eq!(transport.sent_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnected_transport_surfaces() {
        let (client, transport) = client();
        transport.set_connected(false);

        assert!(matches!(
            client.ping().await,
            Err(CommandError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_picture_unsupported() {
        let (client, _transport) = client();
        assert!(matches!(
            client.upload_picture(&[0u8; 16]).await,
            Err(CommandError::Unsupported(_))
        ));
    }
}
