//! Drive connection poller
//!
//! The original dashboard polled the connection-status endpoint on a fixed
//! interval with no upper bound and no way to stop it. This poller is
//! bounded: a fixed attempt budget, and a handle whose drop cancels the
//! background task on component teardown.

use crate::api::professor::ProfessorApi;
use crate::config::PollerConfig;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Terminal result of a polling run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The backend reported a connected Drive
    Connected,
    /// The attempt budget ran out without a connection
    RetriesExhausted,
    /// The handle was cancelled or dropped before a connection
    Cancelled,
}

/// Bounded-retry poller for the Drive connection status
#[derive(Debug)]
pub struct ConnectionPoller {
    api: ProfessorApi,
    config: PollerConfig,
}

impl ConnectionPoller {
    /// Create a poller over the professor API
    pub fn new(api: ProfessorApi, config: PollerConfig) -> Self {
        Self { api, config }
    }

    /// Spawn the polling task
    ///
    /// Status checks run at the configured interval, starting immediately.
    /// A failed status request counts as one attempt.
    pub fn spawn(self) -> PollerHandle {
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = interval(self.config.interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for attempt in 1..=self.config.max_attempts {
                tokio::select! {
                    biased;
                    _ = &mut cancel_rx => {
                        debug!("Connection poll cancelled");
                        return PollOutcome::Cancelled;
                    }
                    _ = ticker.tick() => {}
                }

                match self.api.drive_status().await {
                    Ok(status) if status.connected => {
                        info!(attempt, "Drive connection established");
                        return PollOutcome::Connected;
                    }
                    Ok(_) => debug!(attempt, "Drive not connected yet"),
                    Err(e) => debug!(attempt, error = %e, "Status check failed"),
                }
            }

            warn!(
                max_attempts = self.config.max_attempts,
                "Gave up waiting for Drive connection"
            );
            PollOutcome::RetriesExhausted
        });

        PollerHandle {
            cancel: Some(cancel_tx),
            task: Some(task),
        }
    }
}

/// Handle to a running [`ConnectionPoller`]
///
/// Dropping the handle cancels the polling task.
#[derive(Debug)]
pub struct PollerHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<PollOutcome>>,
}

impl PollerHandle {
    /// Stop polling without waiting for the outcome
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the poll to finish and return its outcome
    pub async fn outcome(mut self) -> PollOutcome {
        match self.task.take() {
            Some(task) => task.await.unwrap_or(PollOutcome::Cancelled),
            None => PollOutcome::Cancelled,
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }
}
