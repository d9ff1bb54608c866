//! Packets exchanged with the transport

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AirCommand, Mode, Parameters, RemoteButton, SwitchCommand};

/// A decoded command: raw id plus typed parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Raw command id; its meaning depends on the packet's lane
    pub id: u32,
    pub parameters: Parameters,
}

impl Command {
    pub fn new(id: u32, parameters: Parameters) -> Self {
        Self { id, parameters }
    }

    /// Command without parameters
    pub fn bare(id: u32) -> Self {
        Self::new(id, Parameters::None)
    }
}

/// Unit handed to and received from the transport
///
/// Packets are immutable once handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub mode: Mode,
    pub command: Command,
}

impl Packet {
    pub fn new(mode: Mode, command: Command) -> Self {
        Self { mode, command }
    }

    /// Advanced-remote lane packet
    pub fn advanced(command: AirCommand, parameters: Parameters) -> Self {
        Self::new(Mode::AdvancedRemote, Command::new(command.id(), parameters))
    }

    /// Mode-switch lane packet
    pub fn switch(command: SwitchCommand) -> Self {
        Self::new(Mode::ModeSwitch, Command::bare(command.id()))
    }

    /// Simple-remote lane packet
    pub fn button(button: RemoteButton) -> Self {
        Self::new(Mode::SimpleRemote, Command::bare(button.id()))
    }

    /// Advanced-remote command id, if this packet is in that lane and the id is known
    pub fn air_command(&self) -> Option<AirCommand> {
        if self.mode != Mode::AdvancedRemote {
            return None;
        }
        AirCommand::from_id(self.command.id).ok()
    }

    /// Mode-switch command id, if this packet is in that lane and the id is known
    pub fn switch_command(&self) -> Option<SwitchCommand> {
        if self.mode != Mode::ModeSwitch {
            return None;
        }
        SwitchCommand::from_id(self.command.id).ok()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] 0x{:04X} ({})",
            self.mode,
            self.command.id,
            self.command.parameters.kind()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_accessors() {
        let packet = Packet::advanced(AirCommand::GetDeviceName, Parameters::None);
        assert_eq!(packet.mode, Mode::AdvancedRemote);
        assert_eq!(packet.air_command(), Some(AirCommand::GetDeviceName));
        assert_eq!(packet.switch_command(), None);

        // Same raw id, different lane
        let packet = Packet::new(Mode::ModeSwitch, Command::bare(0x0003));
        assert_eq!(packet.air_command(), None);
        assert_eq!(packet.switch_command(), Some(SwitchCommand::GetMode));
    }

    #[test]
    fn test_display() {
        let packet = Packet::advanced(AirCommand::ResItemCount, Parameters::Int(3));
        assert_eq!(packet.to_string(), "[advanced-remote] 0x0019 (int)");
    }
}
