// src/monitor/runner.rs
use crate::health::{Outcome, Poller, ProbeError};
use crate::notifier::{MessagingSink, NotificationMessage, Notifier, Timestamp};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Upper bound on waiting for in-flight notifications at shutdown.
const SEND_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Single owner of the throttle state: polls, decides, hands messages to
/// the sink.
pub struct Monitor {
    poller: Arc<Poller>,
    notifier: Notifier,
    sink: Arc<dyn MessagingSink>,
    interval: Duration,
    in_flight: Vec<JoinHandle<()>>,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

#[derive(Clone)]
pub struct MonitorHandle {
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl MonitorHandle {
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Monitor {
    pub fn new(
        poller: Poller,
        notifier: Notifier,
        sink: Arc<dyn MessagingSink>,
        interval: Duration,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            poller: Arc::new(poller),
            notifier,
            sink,
            interval,
            in_flight: Vec::new(),
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        }
    }

    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            shutdown_tx: self.shutdown_tx.clone(),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Poll on every tick until shut down. The first check runs immediately.
    /// Notifications already handed to the sink are awaited before returning.
    pub async fn run(mut self) {
        let mut ticker = interval(self.interval);
        // A check is bounded by the interval, so at most one tick is lost.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut shutdown_rx = self.shutdown_rx.clone();

        info!(
            endpoint = %self.poller.endpoint(),
            interval = ?self.interval,
            sink = self.sink.name(),
            "Starting status monitor"
        );

        loop {
            let stop = tokio::select! {
                _ = ticker.tick() => {
                    tokio::select! {
                        _ = self.check_once() => false,
                        changed = shutdown_rx.changed() => shutdown_requested(changed, &shutdown_rx),
                    }
                }
                changed = shutdown_rx.changed() => shutdown_requested(changed, &shutdown_rx),
            };

            if stop {
                info!("Status monitor shutting down");
                break;
            }
        }

        self.flush().await;
    }

    /// Run one poll and feed the outcome to the notifier. Returns true when
    /// a notification was handed to the sink.
    pub async fn check_once(&mut self) -> bool {
        let poller = self.poller.clone();
        let outcome = poll_guarded(async move { poller.poll().await }, self.interval).await;

        let Some(message) = self.notifier.handle(&outcome, now_millis()) else {
            return false;
        };

        info!(color = ?message.color(), "Posting status notification");
        self.in_flight.retain(|send| !send.is_finished());
        let send = self.dispatch(message);
        self.in_flight.push(send);
        true
    }

    /// Wait for every notification handed to the sink so far.
    pub async fn flush(&mut self) {
        let pending = std::mem::take(&mut self.in_flight);
        if pending.is_empty() {
            return;
        }

        debug!(count = pending.len(), "Waiting for in-flight notifications");
        let drain = async {
            for send in pending {
                if let Err(e) = send.await {
                    error!("Notification task failed: {}", e);
                }
            }
        };

        if timeout(SEND_DRAIN_TIMEOUT, drain).await.is_err() {
            warn!("Gave up waiting for in-flight notifications");
        }
    }

    fn dispatch(&self, message: NotificationMessage) -> JoinHandle<()> {
        let sink = self.sink.clone();

        tokio::spawn(async move {
            if let Err(e) = sink.send(&message).await {
                error!(sink = sink.name(), error = %e, "Failed to post notification");
            }
        })
    }
}

/// Run a check on its own task, bounded by `limit`. A panic becomes the
/// generic "unable to check status" outcome; running past `limit` is a
/// transport timeout.
async fn poll_guarded<F>(check: F, limit: Duration) -> Outcome
where
    F: Future<Output = Outcome> + Send + 'static,
{
    let mut task = tokio::spawn(check);

    match timeout(limit, &mut task).await {
        Ok(Ok(outcome)) => {
            debug!(?outcome, "Poll finished");
            outcome
        }
        Ok(Err(e)) => {
            error!("Status check task failed: {}", e);
            Outcome::internal("unable to check status")
        }
        Err(_) => {
            task.abort();
            warn!(limit = ?limit, "Status check timed out");
            Outcome::unreachable(ProbeError::Transport("Request timeout".to_string()))
        }
    }
}

fn shutdown_requested(
    changed: Result<(), watch::error::RecvError>,
    rx: &watch::Receiver<bool>,
) -> bool {
    changed.is_err() || *rx.borrow()
}

fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis().max(0) as Timestamp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::UnreachableKind;

    async fn explode() -> Outcome {
        panic!("classifier blew up")
    }

    #[tokio::test]
    async fn test_panicking_check_becomes_internal_outcome() {
        let outcome = poll_guarded(explode(), Duration::from_secs(5)).await;

        match &outcome {
            Outcome::Unreachable { kind, detail } => {
                assert_eq!(*kind, UnreachableKind::OtherTransportError);
                assert!(detail.is_unknown());
            }
            other => panic!("expected unreachable, got {:?}", other),
        }

        let message = NotificationMessage::from_outcome(&outcome);
        assert!(message.text().starts_with("Unable to check status!"));
    }

    #[tokio::test]
    async fn test_hung_check_times_out() {
        let outcome = poll_guarded(
            std::future::pending::<Outcome>(),
            Duration::from_millis(20),
        )
        .await;

        assert_eq!(
            outcome,
            Outcome::unreachable(ProbeError::Transport("Request timeout".to_string()))
        );
        let message = NotificationMessage::from_outcome(&outcome);
        assert!(message.text().starts_with("Production is possibly OFFLINE!"));
    }

    #[tokio::test]
    async fn test_finished_check_passes_through() {
        let outcome = poll_guarded(
            async { Outcome::internal("from the check") },
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(outcome, Outcome::internal("from the check"));
    }
}
