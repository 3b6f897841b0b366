use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::api::{ApiError, ApiTransport, DashboardStats};

pub const STATS_PATH: &str = "/admin/get_stats";

/// One `GET /admin/get_stats`. `Ok(None)` means the server declined to answer.
pub async fn fetch_stats(transport: &dyn ApiTransport) -> Result<Option<DashboardStats>, ApiError> {
    let raw = transport.get(STATS_PATH).await?;
    DashboardStats::parse(&raw)
}

/// Background refresh of the dashboard counters.
///
/// The first request goes out one full interval after `start`. Failed polls are
/// logged and skipped; the last good snapshot stays published.
pub struct StatsPoller {
    handle: Option<JoinHandle<()>>,
    latest: watch::Receiver<Option<DashboardStats>>,
}

impl StatsPoller {
    pub fn start(transport: Arc<dyn ApiTransport>, interval: Duration) -> Self {
        let (tx, latest) = watch::channel(None);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match fetch_stats(transport.as_ref()).await {
                    Ok(Some(stats)) => {
                        tracing::trace!("stats refreshed: {:?}", stats);
                        tx.send_replace(Some(stats));
                    }
                    Ok(None) => tracing::debug!("stats refresh declined by server"),
                    Err(e) => tracing::warn!("Error refreshing stats: {}", e),
                }
            }
        });

        tracing::debug!("stats polling started every {:?}", interval);
        Self {
            handle: Some(handle),
            latest,
        }
    }

    pub fn latest(&self) -> Option<DashboardStats> {
        *self.latest.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<DashboardStats>> {
        self.latest.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Cancel the polling task. Only the first call does anything.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                tracing::debug!("stats polling stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for StatsPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
