//! Transport layer seam
//!
//! The transport owns framing, checksums and the physical link (serial or
//! otherwise). Both protocol roles talk to it through [`PacketTransport`]:
//! outbound packets go through `send_packet`, inbound packets that decoded
//! and passed checksum validation are delivered on the `subscribe` channel.
//! Corrupt input never reaches this side of the seam.
//!
//! # Example
//!
//! ```ignore
//! use iap_core::transport::{MockConfig, MockTransport, PacketTransport};
//!
//! let (accessory, player) = MockTransport::pair(&MockConfig::default());
//! let mut inbound = player.subscribe();
//! accessory.send_packet(packet).await?;
//! let received = inbound.recv().await?;
//! ```

mod adapter;
pub mod error;
pub mod mock;

pub use adapter::PacketTransport;
pub use error::TransportError;
pub use mock::{MockConfig, MockTransport};
