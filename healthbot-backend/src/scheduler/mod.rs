//! Alert dispatch loop
//!
//! One background task repeats a single cycle: poll the outbreak feed, fan
//! the current alert out to every subscriber, sleep. Feed failures degrade
//! to an empty poll and per-recipient failures are contained, so only the
//! shutdown signal (or the process ending) stops the loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::channels::{AlertSender, ChannelRouter, RouteDecision};
use crate::db::Database;
use crate::feed::FeedClient;
use crate::models::Alert;

pub struct AlertScheduler {
    db: Arc<Database>,
    feed: FeedClient,
    router: ChannelRouter,
    sender: Arc<dyn AlertSender>,
    poll_interval: Duration,
    relay_all: bool,
}

/// Outcome counts for one dispatch cycle.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl CycleReport {
    fn is_empty(&self) -> bool {
        self.sent == 0 && self.skipped == 0 && self.failed == 0
    }
}

impl AlertScheduler {
    pub fn new(
        db: Arc<Database>,
        feed: FeedClient,
        router: ChannelRouter,
        sender: Arc<dyn AlertSender>,
        poll_interval: Duration,
        relay_all: bool,
    ) -> Self {
        Self {
            db,
            feed,
            router,
            sender,
            poll_interval,
            relay_all,
        }
    }

    /// Run dispatch cycles until the shutdown signal fires.
    pub async fn start(&self, mut shutdown_rx: oneshot::Receiver<()>) {
        log::info!(
            "Alert scheduler started (poll interval: {}s)",
            self.poll_interval.as_secs()
        );

        loop {
            let report = self.run_cycle().await;
            if !report.is_empty() {
                log::info!(
                    "Dispatch cycle complete: {} sent, {} skipped, {} failed",
                    report.sent,
                    report.skipped,
                    report.failed
                );
            }

            tokio::select! {
                _ = &mut shutdown_rx => {
                    log::info!("Alert scheduler shutting down");
                    break;
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    async fn run_cycle(&self) -> CycleReport {
        let alerts = self.feed.fetch_alerts().await;
        self.dispatch_alerts(&alerts).await
    }

    /// Fan the cycle's alerts out to every subscriber, isolating failures
    /// per recipient. An empty alert list short-circuits before the store
    /// is read.
    async fn dispatch_alerts(&self, alerts: &[Alert]) -> CycleReport {
        let mut report = CycleReport::default();

        if alerts.is_empty() {
            log::debug!("No active outbreak alerts this cycle");
            return report;
        }

        let subscribers = match self.db.list_subscribers() {
            Ok(subs) => subs,
            Err(e) => {
                // Treated as "no subscribers this cycle"; the loop survives.
                log::warn!("Failed to list subscribers, skipping cycle: {}", e);
                return report;
            }
        };
        if subscribers.is_empty() {
            return report;
        }

        // The default policy relays only the first alert of the batch;
        // RELAY_ALL_ALERTS opts in to relaying the whole batch.
        let batch = if self.relay_all {
            alerts
        } else {
            &alerts[..1]
        };

        for alert in batch {
            let text = alert.summary();
            if let Some(severity) = alert.severity.as_deref() {
                log::debug!("Dispatching alert (severity: {})", severity);
            }

            for subscriber in &subscribers {
                match self.router.resolve(subscriber) {
                    RouteDecision::Skip { reason } => {
                        log::debug!("Skipping {}: {}", subscriber.recipient_id, reason);
                        report.skipped += 1;
                    }
                    RouteDecision::Deliver { to, from } => {
                        match self.sender.send(&text, &from, &to).await {
                            Ok(()) => report.sent += 1,
                            Err(e) => {
                                log::warn!(
                                    "Send to {} failed: {}",
                                    subscriber.recipient_id,
                                    e
                                );
                                report.failed += 1;
                            }
                        }
                    }
                }
            }
        }

        report
    }
}
