//! iap-core - Shared vocabulary for the iPod accessory protocol
//!
//! Both protocol roles build on this crate: the accessory side that issues
//! commands (`iap-remote`) and the player side that answers them
//! (`iap-emulator`).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        iap-core                          │
//! │                                                          │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────────┐  │
//! │  │ Mode lanes   │  │ Command ids  │  │ Parameters     │  │
//! │  │ (Mode, ...)  │  │ (AirCommand) │  │ (records)      │  │
//! │  └──────────────┘  └──────────────┘  └────────────────┘  │
//! │                          │                               │
//! │                     ┌────┴────┐                          │
//! │                     │ Packet  │                          │
//! │                     └────┬────┘                          │
//! │                 ┌────────┴────────┐                      │
//! │                 │ PacketTransport │                      │
//! │                 │ (codec + link)  │                      │
//! │                 └─────────────────┘                      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Framing, checksums and field encoding belong to the transport; this crate
//! only sees fully decoded `(mode, command id, parameters)` tuples.

pub mod error;
pub mod models;
pub mod transport;

pub use error::ProtocolError;
pub use models::*;
pub use transport::{MockConfig, MockTransport, PacketTransport, TransportError};
