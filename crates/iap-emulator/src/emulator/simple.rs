//! Simple-remote lane
//!
//! Every button maps to one hook. Unlike the advanced lane, an id outside
//! the button table is an error.

use iap_core::{Command, Mode, RemoteButton};
use tracing::debug;

use super::IpodEmulator;
use crate::error::EmulatorError;

impl IpodEmulator {
    pub(super) fn handle_simple_remote(&self, command: &Command) -> Result<(), EmulatorError> {
        let button =
            RemoteButton::from_id(command.id).map_err(|_| EmulatorError::InvalidCommand {
                mode: Mode::SimpleRemote,
                id: command.id,
            })?;
        debug!(?button, "Button");

        let hooks = &self.hooks;
        match button {
            RemoteButton::ButtonReleased => hooks.button_released(),
            RemoteButton::PlayPause => hooks.play_pause(),
            RemoteButton::VolumeUp => hooks.volume_up(),
            RemoteButton::VolumeDown => hooks.volume_down(),
            RemoteButton::NextSong => hooks.skip_forward(),
            RemoteButton::PrevSong => hooks.skip_backward(),
            RemoteButton::NextAlbum => hooks.next_album(),
            RemoteButton::PrevAlbum => hooks.prev_album(),
            RemoteButton::Stop => hooks.stop(),
            RemoteButton::Play => hooks.play(),
            RemoteButton::Pause => hooks.pause(),
            RemoteButton::Mute => hooks.mute(),
            RemoteButton::NextPlaylist => hooks.next_playlist(),
            RemoteButton::PrevPlaylist => hooks.prev_playlist(),
            RemoteButton::Shuffle => hooks.toggle_shuffle(),
            RemoteButton::Repeat => hooks.toggle_repeat(),
            RemoteButton::PowerOff => hooks.power_off(),
            RemoteButton::PowerOn => hooks.power_on(),
            RemoteButton::Menu => hooks.menu(),
            RemoteButton::Select => hooks.select(),
            RemoteButton::ScrollUp => hooks.scroll_up(),
            RemoteButton::ScrollDown => hooks.scroll_down(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::test_support::{emulator, emulator_with};
    use crate::error::EmulatorError;
    use crate::hooks::MockPlayerHooks;
    use iap_core::{Command, Mode, Packet, RemoteButton};

    #[test]
    fn test_button_calls_hook() {
        let mut hooks = MockPlayerHooks::new();
        hooks.expect_skip_forward().times(1).return_const(());
        hooks.expect_button_released().times(1).return_const(());
        let emulator = emulator_with(Arc::new(hooks));

        assert_eq!(
            emulator.process_packet(&Packet::button(RemoteButton::NextSong)),
            Ok(vec![])
        );
        assert_eq!(
            emulator.process_packet(&Packet::button(RemoteButton::ButtonReleased)),
            Ok(vec![])
        );
    }

    #[test]
    fn test_unknown_button_is_invalid() {
        let emulator = emulator();
        // Bit 11 is not a button
        let packet = Packet::new(Mode::SimpleRemote, Command::bare(0x0800));

        assert_eq!(
            emulator.process_packet(&packet),
            Err(EmulatorError::InvalidCommand {
                mode: Mode::SimpleRemote,
                id: 0x0800
            })
        );
    }

    #[test]
    fn test_button_combination_is_invalid() {
        let emulator = emulator();
        let packet = Packet::new(Mode::SimpleRemote, Command::bare(0x0003));

        assert!(emulator.process_packet(&packet).is_err());
    }
}
