//! Mock transport for testing and for wiring both roles in one process

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::{PacketTransport, TransportError};
use crate::models::Packet;

const CHANNEL_CAPACITY: usize = 1024;

/// Mock transport configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockConfig {
    /// Simulated latency in milliseconds
    #[serde(default)]
    pub latency_ms: u64,
}

/// Mock transport
///
/// Records every packet sent through it. A standalone mock only delivers
/// inbound packets injected with [`MockTransport::inject_incoming`]; a linked
/// pair built with [`MockTransport::pair`] also delivers each packet sent on
/// one end as inbound on the other.
pub struct MockTransport {
    config: MockConfig,
    connected: AtomicBool,
    incoming_tx: broadcast::Sender<Packet>,
    peer_tx: Option<broadcast::Sender<Packet>>,
    sent: Mutex<Vec<Packet>>,
}

impl MockTransport {
    pub fn new(config: &MockConfig) -> Self {
        let (incoming_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self::build(config, incoming_tx, None)
    }

    /// Two linked endpoints, e.g. accessory side and player side
    pub fn pair(config: &MockConfig) -> (Arc<Self>, Arc<Self>) {
        let (a_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (b_tx, _) = broadcast::channel(CHANNEL_CAPACITY);

        let a = Self::build(config, a_tx.clone(), Some(b_tx.clone()));
        let b = Self::build(config, b_tx, Some(a_tx));
        (Arc::new(a), Arc::new(b))
    }

    fn build(
        config: &MockConfig,
        incoming_tx: broadcast::Sender<Packet>,
        peer_tx: Option<broadcast::Sender<Packet>>,
    ) -> Self {
        Self {
            config: config.clone(),
            connected: AtomicBool::new(true),
            incoming_tx,
            peer_tx,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Inject an inbound packet (simulates the peer sending it)
    pub fn inject_incoming(&self, packet: Packet) {
        // No subscribers is fine; the packet is simply lost, as on a real link
        let _ = self.incoming_tx.send(packet);
    }

    /// Packets sent so far, oldest first
    pub fn sent(&self) -> Vec<Packet> {
        self.sent.lock().clone()
    }

    /// Number of packets sent so far
    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Drain the record of sent packets
    pub fn take_sent(&self) -> Vec<Packet> {
        std::mem::take(&mut *self.sent.lock())
    }

    /// Set connection state
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

#[async_trait]
impl PacketTransport for MockTransport {
    async fn send_packet(&self, packet: Packet) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectionClosed);
        }

        // Simulate latency
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        tracing::debug!(%packet, "Mock transport: sent packet");
        self.sent.lock().push(packet.clone());

        if let Some(peer) = &self.peer_tx {
            let _ = peer.send(packet);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Packet> {
        self.incoming_tx.subscribe()
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
