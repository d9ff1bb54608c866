//! Packet transport trait

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::TransportError;
use crate::models::Packet;

/// Transport-agnostic interface for exchanging decoded packets
///
/// Implementations encode outbound packets onto the link and publish every
/// fully decoded inbound packet to subscribers, once per packet.
#[async_trait]
pub trait PacketTransport: Send + Sync {
    /// Encode and transmit a packet
    async fn send_packet(&self, packet: Packet) -> Result<(), TransportError>;

    /// Subscribe to inbound packets
    ///
    /// Packets arriving before the subscription is taken are not replayed.
    fn subscribe(&self) -> broadcast::Receiver<Packet>;

    /// Check if the link is up
    async fn is_connected(&self) -> bool;
}
