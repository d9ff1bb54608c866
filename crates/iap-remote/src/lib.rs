//! iap-remote - Accessory side of the iPod accessory protocol
//!
//! An accessory (car dock, remote, display) issues commands to the player and
//! waits for replies that may arrive out of order, interleaved with replies to
//! other commands, or split over several packets.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    RemoteClient                     │
//! │  one method per advanced-remote command             │
//! │                                                     │
//! │   send_packet ──────────────────────┐               │
//! │                                     ▼               │
//! │  ┌──────────────┐           ┌───────────────┐       │
//! │  │ ReplyQueue   │◄──────────│PacketTransport│       │
//! │  │ (correlation)│  inbound  │ (external)    │       │
//! │  └──────┬───────┘           └───────────────┘       │
//! │         │ elapsed-time broadcasts                   │
//! │         ▼                                           │
//! │   poll_updates()                                    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! At most one synchronous wait is outstanding at a time; fire-and-forget
//! sends may run concurrently with it.

pub mod client;
pub mod config;
pub mod correlation;
pub mod error;

pub use client::RemoteClient;
pub use config::RemoteConfig;
pub use correlation::ReplyQueue;
pub use error::{CommandError, CommandResult};
