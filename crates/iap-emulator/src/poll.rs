//! Elapsed-time broadcaster
//!
//! While polling is enabled the player pushes the elapsed time of the
//! current track to the accessory at a fixed interval, unsolicited.
//!
//! Cancellation is cooperative: the token is checked once per iteration, so
//! a task asleep when [`Poller::stop`] is called finishes that sleep before
//! it notices. At most one further broadcast can follow a stop.

use std::sync::Arc;
use std::time::Duration;

use iap_core::{AirCommand, Packet, PacketTransport, Parameters};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::hooks::PlayerHooks;

struct PollTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl PollTask {
    fn is_live(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }
}

/// Runs at most one broadcast task at a time
pub struct Poller {
    transport: Arc<dyn PacketTransport>,
    hooks: Arc<dyn PlayerHooks>,
    interval: Duration,
    task: Mutex<Option<PollTask>>,
}

impl Poller {
    pub fn new(
        transport: Arc<dyn PacketTransport>,
        hooks: Arc<dyn PlayerHooks>,
        interval: Duration,
    ) -> Self {
        Self {
            transport,
            hooks,
            interval,
            task: Mutex::new(None),
        }
    }

    /// Start broadcasting; does nothing if a task is already running
    ///
    /// Returns whether a new task was spawned. Needs a tokio runtime; outside
    /// one the request is logged and dropped.
    pub fn start(&self) -> bool {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(PollTask::is_live) {
            debug!("Polling already running");
            return false;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(error = %e, "Cannot start polling outside a tokio runtime");
                return false;
            }
        };

        // A stopped task may still be finishing its last sleep
        if let Some(old) = task.take() {
            old.handle.abort();
        }

        let cancel = CancellationToken::new();
        let handle = runtime.spawn(Self::run(
            self.transport.clone(),
            self.hooks.clone(),
            self.interval,
            cancel.clone(),
        ));

        *task = Some(PollTask { cancel, handle });
        info!(interval_ms = self.interval.as_millis() as u64, "Polling started");
        true
    }

    /// Ask the running task to stop after its current iteration
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().as_ref() {
            if !task.cancel.is_cancelled() {
                task.cancel.cancel();
                info!("Polling stopped");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(PollTask::is_live)
    }

    async fn run(
        transport: Arc<dyn PacketTransport>,
        hooks: Arc<dyn PlayerHooks>,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        while !cancel.is_cancelled() {
            let elapsed_ms = hooks.elapsed_time_ms();
            let packet = Packet::advanced(AirCommand::ResTimeElapsed, Parameters::Int(elapsed_ms));

            if let Err(e) = transport.send_packet(packet).await {
                warn!(error = %e, "Elapsed-time broadcast failed");
            }

            tokio::time::sleep(interval).await;
        }
        debug!("Poll task exited");
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.cancel.cancel();
            task.handle.abort();
        }
    }
}
