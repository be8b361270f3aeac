//! Fixed-cadence trigger for the publish pipeline.
//!
//! Every tick spawns a cycle on its own task, so the ticker never waits for a
//! slow fetch or send. A tick that lands while the previous cycle is still in
//! flight is skipped rather than run alongside it.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::services::{Notifier, PublishService};
use crate::sources::FeedSource;
use crate::storage::DeliveryStore;

pub const POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Clears the in-flight flag when the cycle task ends, panics included
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Scheduler<S, N, D>
where
    S: FeedSource + 'static,
    N: Notifier + 'static,
    D: DeliveryStore + 'static,
{
    service: Arc<PublishService<S, N, D>>,
    interval: Duration,
    in_flight: Arc<AtomicBool>,
}

impl<S, N, D> Scheduler<S, N, D>
where
    S: FeedSource + 'static,
    N: Notifier + 'static,
    D: DeliveryStore + 'static,
{
    pub fn new(service: PublishService<S, N, D>) -> Self {
        Self {
            service: Arc::new(service),
            interval: POLL_INTERVAL,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn service(&self) -> &Arc<PublishService<S, N, D>> {
        &self.service
    }

    pub fn is_cycle_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Start a poll cycle in the background unless one is already running
    pub fn tick(&self) -> Option<JoinHandle<()>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("previous cycle still running, skipping this tick");
            return None;
        }

        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        let service = Arc::clone(&self.service);

        Some(tokio::spawn(async move {
            let _guard = guard;
            tracing::info!("job start...");

            match service.run_poll_cycle().await {
                Ok(report) => tracing::info!(
                    fetched = report.fetched,
                    delivered = report.delivered,
                    skipped = report.skipped,
                    stopped_at = report.stopped_at.as_deref().unwrap_or("-"),
                    "cycle finished"
                ),
                Err(e) => tracing::error!("cycle failed: {}", e),
            }
        }))
    }

    /// Tick immediately, then every interval, until `shutdown` resolves.
    /// A cycle still running at shutdown is awaited before returning.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut timer = tokio::time::interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut last: Option<JoinHandle<()>> = None;

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    if let Some(handle) = self.tick() {
                        last = Some(handle);
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!("scheduler stopped");
                    break;
                }
            }
        }

        if let Some(handle) = last {
            if let Err(e) = handle.await {
                tracing::error!("cycle task aborted: {}", e);
            }
        }
    }
}
