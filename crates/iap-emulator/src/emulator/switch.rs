//! Mode-switch lane

use iap_core::{Command, Packet, SwitchCommand};
use tracing::{debug, info};

use super::IpodEmulator;

impl IpodEmulator {
    pub(super) fn handle_mode_switch(&self, command: &Command) -> Vec<Packet> {
        let Ok(switch) = SwitchCommand::from_id(command.id) else {
            debug!(
                command = format!("0x{:04X}", command.id),
                "Ignoring unknown mode-switch command"
            );
            return Vec::new();
        };

        if switch == SwitchCommand::GetMode {
            return vec![self.mode_status()];
        }

        match switch.target_mode() {
            Some(mode) => {
                let previous = std::mem::replace(&mut self.state.write().mode, mode);
                info!(from = %previous, to = %mode, "Mode changed");
            }
            None => debug!(command = ?switch, "Ignoring mode-status reply"),
        }
        Vec::new()
    }

    /// Mode-status reply for the current mode
    pub(super) fn mode_status(&self) -> Packet {
        Packet::switch(SwitchCommand::mode_status(self.mode()))
    }
}
