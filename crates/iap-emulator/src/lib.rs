//! iap-emulator - Player side of the iPod accessory protocol
//!
//! Lets a host pretend to be an iPod towards an accessory. Inbound packets
//! are routed by their mode lane:
//!
//! - **Mode switch / request mode status**: change or report the operating mode
//! - **Voice recorder**: nothing to do, the player only sends in this mode
//! - **Simple remote**: one action per button; unknown buttons are an error
//! - **Advanced remote**: queries, navigation and playback control; unknown
//!   ids are silently ignored
//!
//! Media content and playback actions come from a [`PlayerHooks`]
//! implementation supplied by the host. While polling is enabled a
//! [`Poller`] broadcasts the elapsed time of the current track.

pub mod config;
pub mod emulator;
pub mod error;
pub mod hooks;
pub mod poll;
pub mod state;

pub use config::{EmulatorConfig, ScreenConfig};
pub use emulator::{IpodEmulator, Replies};
pub use error::EmulatorError;
pub use hooks::{DefaultHooks, PlayerHooks};
pub use poll::Poller;
pub use state::SessionState;
