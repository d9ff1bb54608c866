//! Player emulator: mode state machine and dispatcher
//!
//! [`IpodEmulator::replies`] is the synchronous core: it routes a packet by
//! its mode lane, applies state changes and yields the replies.
//! [`IpodEmulator::on_packet_received`] sends each reply through the
//! transport as it is produced.

mod advanced;
mod replies;
mod simple;
mod switch;

pub use replies::Replies;

use std::sync::{Arc, Weak};

use iap_core::{Mode, OperatingMode, Packet, PacketTransport, PlaybackStatus};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::EmulatorConfig;
use crate::error::EmulatorError;
use crate::hooks::PlayerHooks;
use crate::poll::Poller;
use crate::state::SessionState;

/// Emulated player
pub struct IpodEmulator {
    transport: Arc<dyn PacketTransport>,
    hooks: Arc<dyn PlayerHooks>,
    state: RwLock<SessionState>,
    poller: Poller,

    /// Background listener task handle
    listener_handle: Mutex<Option<JoinHandle<()>>>,
}

impl IpodEmulator {
    pub fn new(
        transport: Arc<dyn PacketTransport>,
        config: &EmulatorConfig,
        hooks: Arc<dyn PlayerHooks>,
    ) -> Self {
        let poller = Poller::new(transport.clone(), hooks.clone(), config.poll_interval());

        Self {
            transport,
            hooks,
            state: RwLock::new(SessionState::from_config(config)),
            poller,
            listener_handle: Mutex::new(None),
        }
    }

    /// Feed inbound packets from the transport into the dispatcher
    ///
    /// The task holds only a weak reference, so it ends on its own once the
    /// emulator is dropped.
    pub fn start_listener(self: &Arc<Self>) {
        let mut incoming_rx = self.transport.subscribe();
        let emulator: Weak<Self> = Arc::downgrade(self);

        let handle = tokio::spawn(async move {
            loop {
                match incoming_rx.recv().await {
                    Ok(packet) => {
                        let Some(emulator) = emulator.upgrade() else {
                            break;
                        };
                        if let Err(e) = emulator.on_packet_received(&packet).await {
                            warn!(error = %e, %packet, "Failed to handle inbound packet");
                        }
                    }
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

        if let Some(old) = self.listener_handle.lock().replace(handle) {
            old.abort();
        }
    }

    /// Inbound hook: dispatch `packet` and send every reply
    pub async fn on_packet_received(&self, packet: &Packet) -> Result<(), EmulatorError> {
        for reply in self.replies(packet)? {
            self.transport.send_packet(reply).await?;
        }
        Ok(())
    }

    /// Dispatch one packet
    ///
    /// State changes and host actions happen before this returns; item-name
    /// replies are generated as the iterator is advanced.
    pub fn replies(&self, packet: &Packet) -> Result<Replies<'_>, EmulatorError> {
        debug!(%packet, "Dispatching packet");

        match packet.mode {
            Mode::ModeSwitch => Ok(self.handle_mode_switch(&packet.command).into()),
            Mode::RequestModeStatus => Ok(vec![self.mode_status()].into()),
            // The player only ever sends in this mode
            Mode::VoiceRecorder => Ok(Replies::none()),
            Mode::SimpleRemote => self
                .handle_simple_remote(&packet.command)
                .map(|()| Replies::none()),
            Mode::AdvancedRemote => Ok(self.handle_advanced_remote(&packet.command)),
        }
    }

    /// Dispatch one packet and collect every reply
    ///
    /// Item-name ranges are materialized in full; hosts feeding untrusted
    /// input should use [`IpodEmulator::replies`] instead.
    pub fn process_packet(&self, packet: &Packet) -> Result<Vec<Packet>, EmulatorError> {
        self.replies(packet).map(Iterator::collect)
    }

    // =========================================================================
    // Host-facing state access
    // =========================================================================

    /// Current operating mode
    pub fn mode(&self) -> OperatingMode {
        self.state.read().mode
    }

    /// Snapshot of the session state
    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    /// Report a playback status change from the host's player
    pub fn set_playback_status(&self, status: PlaybackStatus) {
        self.state.write().status = status;
    }

    pub fn set_device_name(&self, name: impl Into<String>) {
        self.state.write().device_name = name.into();
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    pub fn start_polling(&self) -> bool {
        self.poller.start()
    }

    pub fn stop_polling(&self) {
        self.poller.stop();
    }
}

impl Drop for IpodEmulator {
    fn drop(&mut self) {
        if let Some(handle) = self.listener_handle.get_mut().take() {
            handle.abort();
        }
    }
}
