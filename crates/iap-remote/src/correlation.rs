//! Reply correlation
//!
//! All inbound packets except elapsed-time broadcasts land in one FIFO queue.
//! A waiter drains the queue, consuming entries that answer its exchange and
//! putting everything else back at the tail until it expires, so a reply for
//! an interleaved exchange survives until that exchange waits for it.
//!
//! At most one wait runs at a time; the receiver sits behind an async mutex,
//! so a second waiter queues up behind the first instead of stealing entries.

use std::time::Duration;

use iap_core::{AirCommand, OperatingMode, Packet, Parameters, ResultCode, TransportError};
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::RemoteConfig;
use crate::error::{CommandError, CommandResult};

const POLL_CHANNEL_CAPACITY: usize = 256;

/// Queued inbound packet
#[derive(Debug)]
struct PendingReply {
    packet: Packet,
    /// Absolute expiry: arrival time plus the queue's timeout
    expires_at: Instant,
}

/// Outcome of inspecting one queued entry
enum Verdict<T> {
    /// Entry completes the exchange
    Done(T),
    /// Entry fails the exchange
    Fail(CommandError),
    /// Entry belongs to the exchange but more are needed
    Consumed,
    /// Entry belongs to some other exchange
    Foreign,
}

/// Correlates inbound packets with the exchange waiting for them
pub struct ReplyQueue {
    inbound_tx: mpsc::UnboundedSender<PendingReply>,
    inbound_rx: Mutex<mpsc::UnboundedReceiver<PendingReply>>,
    timeout: Duration,
    idle_backoff: Duration,
    poll_tx: broadcast::Sender<u32>,
}

impl ReplyQueue {
    pub fn new(config: &RemoteConfig) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (poll_tx, _) = broadcast::channel(POLL_CHANNEL_CAPACITY);

        Self {
            inbound_tx,
            inbound_rx: Mutex::new(inbound_rx),
            timeout: config.timeout(),
            idle_backoff: config.idle_backoff(),
            poll_tx,
        }
    }

    /// Per-exchange timeout, also the lifetime of a queued entry
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Elapsed-time broadcasts, in milliseconds
    pub fn poll_updates(&self) -> broadcast::Receiver<u32> {
        self.poll_tx.subscribe()
    }

    /// Number of entries currently queued
    pub async fn pending(&self) -> usize {
        self.inbound_rx.lock().await.len()
    }

    /// Inbound hook for the transport
    ///
    /// Elapsed-time broadcasts bypass the queue entirely; everything else is
    /// queued with an expiry of now plus the timeout.
    pub fn on_packet_received(&self, packet: Packet) {
        if packet.air_command() == Some(AirCommand::ResTimeElapsed) {
            match packet.command.parameters.as_int() {
                Some(elapsed_ms) => {
                    debug!(elapsed_ms, "Poll update");
                    // Nobody listening is fine
                    let _ = self.poll_tx.send(elapsed_ms);
                }
                None => warn!(
                    kind = packet.command.parameters.kind(),
                    "Dropping malformed elapsed-time broadcast"
                ),
            }
            return;
        }

        self.prune_expired();
        debug!(%packet, "Queueing inbound packet");
        let entry = PendingReply {
            packet,
            expires_at: Instant::now() + self.timeout,
        };
        // The receiver lives as long as self, so this cannot fail
        let _ = self.inbound_tx.send(entry);
    }

    /// Drop expired entries while no wait is draining the queue
    ///
    /// Survivors keep their order. A running wait does its own expiry.
    fn prune_expired(&self) {
        let Ok(mut rx) = self.inbound_rx.try_lock() else {
            return;
        };

        let now = Instant::now();
        let mut dropped = 0usize;
        for _ in 0..rx.len() {
            let Ok(entry) = rx.try_recv() else {
                break;
            };
            if now > entry.expires_at {
                dropped += 1;
            } else {
                let _ = self.inbound_tx.send(entry);
            }
        }
        if dropped > 0 {
            debug!(dropped, "Pruned expired replies");
        }
    }

    /// Wait for the reply to `request`
    ///
    /// Returns the dedicated reply's parameters, or `Parameters::None` for a
    /// successful feedback record.
    pub async fn wait_for_reply(&self, request: AirCommand) -> CommandResult<Parameters> {
        let expected = request.reply();
        let command = request.id();

        let outcome = self
            .drain_until(self.timeout, |packet| {
                let Some(id) = packet.air_command() else {
                    return Verdict::Foreign;
                };
                if Some(id) == expected {
                    return Verdict::Done(packet.command.parameters.clone());
                }

                match id {
                    AirCommand::NotUnderstood
                        if referenced_command(&packet.command.parameters) == Some(command) =>
                    {
                        Verdict::Fail(CommandError::NotUnderstood { command })
                    }
                    AirCommand::Feedback => match &packet.command.parameters {
                        Parameters::Feedback(feedback) if feedback.refers_to(request) => {
                            match feedback.result_code() {
                                Ok(ResultCode::Success) => Verdict::Done(Parameters::None),
                                Ok(ResultCode::Failure) => {
                                    Verdict::Fail(CommandError::Failed { command })
                                }
                                Ok(ResultCode::BadLength) => {
                                    Verdict::Fail(CommandError::LengthExceeded { command })
                                }
                                Ok(ResultCode::ResponseGivenForCommand) => {
                                    Verdict::Fail(CommandError::IsResponse { command })
                                }
                                Err(e) => {
                                    warn!(
                                        command = format!("0x{:04X}", command),
                                        error = %e,
                                        "Unknown result code in feedback, treating as failure"
                                    );
                                    Verdict::Fail(CommandError::Failed { command })
                                }
                            }
                        }
                        _ => Verdict::Foreign,
                    },
                    _ => Verdict::Foreign,
                }
            })
            .await;

        outcome.unwrap_or(Err(CommandError::Timeout {
            received: 0,
            expected: 1,
        }))
    }

    /// Collect `expected` item-name replies within `timeout`
    ///
    /// Names come back ordered by offset regardless of arrival order.
    pub async fn collect_named_items(
        &self,
        expected: usize,
        timeout: Duration,
    ) -> CommandResult<Vec<String>> {
        if expected == 0 {
            return Ok(Vec::new());
        }

        let mut items = Vec::with_capacity(expected);
        let outcome = self
            .drain_until(timeout, |packet| {
                match (packet.air_command(), &packet.command.parameters) {
                    (Some(AirCommand::ResItemName), Parameters::ItemName(item)) => {
                        items.push(item.clone());
                        if items.len() == expected {
                            Verdict::Done(())
                        } else {
                            Verdict::Consumed
                        }
                    }
                    _ => Verdict::Foreign,
                }
            })
            .await;

        match outcome {
            Some(Ok(())) => {
                items.sort_by_key(|item| item.offset);
                Ok(items.into_iter().map(|item| item.name).collect())
            }
            Some(Err(e)) => Err(e),
            None => Err(CommandError::Timeout {
                received: items.len(),
                expected,
            }),
        }
    }

    /// Wait for a mode-status reply in the mode-switch lane
    pub async fn wait_for_mode_status(&self) -> CommandResult<OperatingMode> {
        let outcome = self
            .drain_until(self.timeout, |packet| {
                match packet.switch_command().and_then(|c| c.reported_mode()) {
                    Some(mode) => Verdict::Done(mode),
                    None => Verdict::Foreign,
                }
            })
            .await;

        outcome.unwrap_or(Err(CommandError::Timeout {
            received: 0,
            expected: 1,
        }))
    }

    /// Drain the queue until `classify` settles the exchange or `timeout` passes
    ///
    /// Each pop waits at most half the timeout (clamped to what remains).
    /// Foreign entries go back to the tail unless expired. Once a full pass
    /// over the queue has turned up nothing, the loop backs off before
    /// looking again. Returns `None` on deadline.
    async fn drain_until<T, F>(&self, timeout: Duration, mut classify: F) -> Option<CommandResult<T>>
    where
        F: FnMut(&Packet) -> Verdict<T>,
    {
        let mut rx = self.inbound_rx.lock().await;
        let deadline = Instant::now() + timeout;
        let granularity = timeout / 2;
        // Foreign entries seen since the last backoff or consumed entry
        let mut skipped = 0usize;

        loop {
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let wait = granularity.min(deadline - now);

            let entry = match tokio::time::timeout(wait, rx.recv()).await {
                Ok(Some(entry)) => entry,
                Ok(None) => return Some(Err(TransportError::ConnectionClosed.into())),
                Err(_) => continue,
            };

            match classify(&entry.packet) {
                Verdict::Done(value) => return Some(Ok(value)),
                Verdict::Fail(e) => return Some(Err(e)),
                Verdict::Consumed => skipped = 0,
                Verdict::Foreign => {
                    if Instant::now() <= entry.expires_at {
                        let _ = self.inbound_tx.send(entry);
                    } else {
                        debug!(packet = %entry.packet, "Dropping expired reply");
                    }

                    skipped += 1;
                    if !rx.is_empty() && skipped >= rx.len() {
                        let remaining = deadline.saturating_duration_since(Instant::now());
                        tokio::time::sleep(self.idle_backoff.min(remaining)).await;
                        skipped = 0;
                    }
                }
            }
        }
    }
}

/// Command id referenced by a not-understood marker
fn referenced_command(parameters: &Parameters) -> Option<u32> {
    match parameters {
        Parameters::Feedback(feedback) => Some(u32::from(feedback.command)),
        Parameters::Int(id) => Some(*id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iap_core::{Feedback, ItemName, SwitchCommand};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn queue() -> ReplyQueue {
        ReplyQueue::new(&RemoteConfig::default())
    }

    fn item_name(offset: u32) -> Packet {
        Packet::advanced(
            AirCommand::ResItemName,
            Parameters::ItemName(ItemName {
                offset,
                name: format!("Item {}", offset),
            }),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_dedicated_reply_returns_parameters() {
        let queue = queue();
        queue.on_packet_received(Packet::advanced(
            AirCommand::ResDeviceName,
            Parameters::Text("iPod".into()),
        ));

        let reply = queue.wait_for_reply(AirCommand::GetDeviceName).await;
        assert_eq!(reply, Ok(Parameters::Text("iPod".into())));
        assert_eq!(queue.pending().await, 0);
    }

    #[rstest]
    #[case(ResultCode::Success, Ok(Parameters::None))]
    #[case(ResultCode::Failure, Err(CommandError::Failed { command: 0x0B }))]
    #[case(ResultCode::BadLength, Err(CommandError::LengthExceeded { command: 0x0B }))]
    #[case(
        ResultCode::ResponseGivenForCommand,
        Err(CommandError::IsResponse { command: 0x0B })
    )]
    #[tokio::test(start_paused = true)]
    async fn test_feedback_mapping(
        #[case] result: ResultCode,
        #[case] expected: CommandResult<Parameters>,
    ) {
        let queue = queue();
        queue.on_packet_received(Packet::advanced(
            AirCommand::Feedback,
            Parameters::Feedback(Feedback::new(AirCommand::SetFlag, result)),
        ));

        assert_eq!(queue.wait_for_reply(AirCommand::SetFlag).await, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_result_code_is_failure() {
        let queue = queue();
        queue.on_packet_received(Packet::advanced(
            AirCommand::Feedback,
            Parameters::Feedback(Feedback {
                command: 0x000B,
                result: 0x7F,
            }),
        ));

        let err = queue.wait_for_reply(AirCommand::SetFlag).await.unwrap_err();
        assert!(err.is_failure());
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_understood() {
        let queue = queue();
        queue.on_packet_received(Packet::advanced(
            AirCommand::NotUnderstood,
            Parameters::Int(0x0038),
        ));

        assert_eq!(
            queue.wait_for_reply(AirCommand::GetColorScreenInfo).await,
            Err(CommandError::NotUnderstood { command: 0x38 })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_feedback_for_other_command_is_preserved() {
        let queue = queue();
        queue.on_packet_received(Packet::advanced(
            AirCommand::Feedback,
            Parameters::Feedback(Feedback::new(AirCommand::PlaybackControl, ResultCode::Success)),
        ));
        queue.on_packet_received(Packet::advanced(
            AirCommand::Feedback,
            Parameters::Feedback(Feedback::new(AirCommand::SetFlag, ResultCode::Failure)),
        ));

        assert_eq!(
            queue.wait_for_reply(AirCommand::SetFlag).await,
            Err(CommandError::Failed { command: 0x0B })
        );
        assert_eq!(
            queue.wait_for_reply(AirCommand::PlaybackControl).await,
            Ok(Parameters::None)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_interleaved_reply_survives_other_wait() {
        let queue = queue();
        // Reply for exchange B arrives first
        queue.on_packet_received(Packet::advanced(
            AirCommand::ResDeviceName,
            Parameters::Text("iPod".into()),
        ));
        queue.on_packet_received(Packet::advanced(
            AirCommand::ResDeviceType,
            Parameters::Int(0x0B),
        ));

        assert_eq!(
            queue.wait_for_reply(AirCommand::GetDeviceType).await,
            Ok(Parameters::Int(0x0B))
        );
        assert_eq!(queue.pending().await, 1);
        assert_eq!(
            queue.wait_for_reply(AirCommand::GetDeviceName).await,
            Ok(Parameters::Text("iPod".into()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_without_reply() {
        let queue = queue();
        let start = Instant::now();

        let err = queue.wait_for_reply(AirCommand::Ping).await.unwrap_err();
        assert_eq!(
            err,
            CommandError::Timeout {
                received: 0,
                expected: 1
            }
        );
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(start.elapsed() <= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_foreign_entry_expires_during_wait() {
        let queue = queue();
        queue.on_packet_received(Packet::advanced(AirCommand::Pong, Parameters::None));
        tokio::time::advance(Duration::from_secs(2)).await;

        let err = queue.wait_for_reply(AirCommand::GetFlag).await.unwrap_err();
        assert!(err.is_timeout());
        // Expired foreign entries are dropped rather than requeued
        assert_eq!(queue.pending().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_reply_behind_unrelated_entries() {
        let queue = std::sync::Arc::new(queue());
        queue.on_packet_received(Packet::advanced(AirCommand::Pong, Parameters::None));
        queue.on_packet_received(Packet::advanced(
            AirCommand::ResDeviceName,
            Parameters::Text("iPod".into()),
        ));
        let feeder = queue.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            feeder.on_packet_received(Packet::advanced(
                AirCommand::ResDeviceType,
                Parameters::Int(0x0B),
            ));
        });

        let start = Instant::now();
        assert_eq!(
            queue.wait_for_reply(AirCommand::GetDeviceType).await,
            Ok(Parameters::Int(0x0B))
        );
        assert!(start.elapsed() < Duration::from_millis(500));
        assert_eq!(queue.pending().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrelated_entries_alone_time_out() {
        let queue = queue();
        for _ in 0..3 {
            queue.on_packet_received(Packet::advanced(AirCommand::Pong, Parameters::None));
        }
        let start = Instant::now();

        let err = queue
            .collect_named_items(2, Duration::from_secs(4))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::Timeout {
                received: 0,
                expected: 2
            }
        );
        assert!(start.elapsed() >= Duration::from_secs(4));
        assert!(start.elapsed() <= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entries_pruned_on_arrival() {
        let queue = queue();
        queue.on_packet_received(Packet::advanced(AirCommand::Pong, Parameters::None));
        queue.on_packet_received(Packet::advanced(AirCommand::Pong, Parameters::None));
        tokio::time::advance(Duration::from_secs(2)).await;

        queue.on_packet_received(Packet::advanced(
            AirCommand::ResDeviceType,
            Parameters::Int(0x0B),
        ));

        assert_eq!(queue.pending().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_arriving_mid_wait() {
        let queue = std::sync::Arc::new(queue());
        let feeder = queue.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(700)).await;
            feeder.on_packet_received(Packet::advanced(AirCommand::Pong, Parameters::None));
        });

        assert_eq!(
            queue.wait_for_reply(AirCommand::Ping).await,
            Ok(Parameters::None)
        );
    }

    #[rstest]
    #[case(vec![0, 1, 2])]
    #[case(vec![2, 1, 0])]
    #[case(vec![1, 2, 0])]
    #[case(vec![3, 0, 4, 2, 1])]
    #[case(vec![5])]
    #[tokio::test(start_paused = true)]
    async fn test_item_names_ordered_by_offset(#[case] arrival: Vec<u32>) {
        let queue = queue();
        for &offset in &arrival {
            queue.on_packet_received(item_name(offset));
        }

        let mut sorted = arrival.clone();
        sorted.sort_unstable();
        let expected: Vec<String> = sorted.iter().map(|o| format!("Item {}", o)).collect();

        let names = queue
            .collect_named_items(arrival.len(), Duration::from_secs(4))
            .await
            .unwrap();
        assert_eq!(names, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_item_names_timeout_reports_count() {
        let queue = queue();
        for offset in 0..3 {
            queue.on_packet_received(item_name(offset));
        }
        let start = Instant::now();

        let err = queue
            .collect_named_items(5, Duration::from_secs(4))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::Timeout {
                received: 3,
                expected: 5
            }
        );
        assert!(start.elapsed() >= Duration::from_secs(4));
        assert!(start.elapsed() <= Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_item_names_skip_unrelated_replies() {
        let queue = queue();
        queue.on_packet_received(item_name(1));
        queue.on_packet_received(Packet::advanced(
            AirCommand::ResPlaylistSize,
            Parameters::Int(12),
        ));
        queue.on_packet_received(item_name(0));

        let names = queue
            .collect_named_items(2, Duration::from_secs(4))
            .await
            .unwrap();
        assert_eq!(names, vec!["Item 0".to_string(), "Item 1".to_string()]);
        assert_eq!(
            queue.wait_for_reply(AirCommand::GetPlaylistSize).await,
            Ok(Parameters::Int(12))
        );
    }

    #[tokio::test]
    async fn test_zero_items_returns_immediately() {
        let queue = queue();
        let names = queue
            .collect_named_items(0, Duration::from_secs(4))
            .await
            .unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_time_bypasses_queue() {
        let queue = queue();
        let mut updates = queue.poll_updates();

        queue.on_packet_received(Packet::advanced(
            AirCommand::ResTimeElapsed,
            Parameters::Int(61_000),
        ));

        assert_eq!(updates.recv().await.unwrap(), 61_000);
        assert_eq!(queue.pending().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mode_status_reply() {
        let queue = queue();
        queue.on_packet_received(Packet::advanced(AirCommand::Pong, Parameters::None));
        queue.on_packet_received(Packet::switch(SwitchCommand::ResModeAdvancedRemote));

        assert_eq!(
            queue.wait_for_mode_status().await,
            Ok(OperatingMode::AdvancedRemote)
        );
        // The pong is still there for whoever pinged
        assert_eq!(
            queue.wait_for_reply(AirCommand::Ping).await,
            Ok(Parameters::None)
        );
    }
}
