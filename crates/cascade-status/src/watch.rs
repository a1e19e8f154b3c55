//! Debounced status recomputation.
//!
//! Two sources request a refresh: the periodic timer and a change in the
//! phase directories' [`TreeFingerprint`]. Requests are collapsed into a single
//! pending flag, so at most one summary is being computed at any time and a
//! burst of requests during a computation costs exactly one more run.
//!
//! A fingerprint change only counts once the tree has been quiet for one
//! debounce period, so an editor saving several files in a row triggers a
//! single recomputation.

use anyhow::Result;
use cascade_config::WatchConfig;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::fingerprint::TreeFingerprint;
use crate::status::{PlanStatusSummary, StatusManager};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Keeps a [`PlanStatusSummary`] current until shut down.
pub struct StatusWatcher {
    manager: StatusManager,
    config: WatchConfig,
}

impl StatusWatcher {
    pub fn new(manager: StatusManager, config: WatchConfig) -> Self {
        Self { manager, config }
    }

    /// Directory scanning is blocking; keep it off the async workers.
    async fn fingerprint(&self) -> Result<TreeFingerprint> {
        let layout = self.manager.layout().clone();
        Ok(tokio::task::spawn_blocking(move || TreeFingerprint::of(&layout)).await?)
    }

    /// Run until `shutdown` turns true or its sender is dropped.
    ///
    /// `on_change` is called with the first summary and then whenever a
    /// recomputed summary differs from the previous one.
    pub async fn run<F>(self, mut shutdown: watch::Receiver<bool>, mut on_change: F) -> Result<()>
    where
        F: FnMut(&PlanStatusSummary),
    {
        info!(
            root = %self.manager.layout().root().display(),
            interval_secs = self.config.interval.as_secs(),
            "Watching plans tree"
        );

        // tokio rejects zero periods
        let mut refresh = time::interval(self.config.interval.max(MIN_PERIOD));
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut poll = time::interval(self.config.debounce.max(MIN_PERIOD));
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut observed = self.fingerprint().await?;
        let mut settling = false;
        let mut pending = true;
        let mut in_flight: Option<JoinHandle<PlanStatusSummary>> = None;
        let mut last: Option<PlanStatusSummary> = None;

        loop {
            if *shutdown.borrow() {
                break;
            }

            if pending && in_flight.is_none() {
                pending = false;
                let manager = self.manager.clone();
                in_flight = Some(tokio::task::spawn_blocking(move || manager.summarize()));
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = refresh.tick() => {
                    pending = true;
                }
                _ = poll.tick() => {
                    match self.fingerprint().await {
                        Ok(current) if current != observed => {
                            debug!(fingerprint = %current.short(), "Plans tree changed");
                            observed = current;
                            settling = true;
                        }
                        Ok(_) if settling => {
                            settling = false;
                            pending = true;
                        }
                        Ok(_) => {}
                        Err(e) => warn!(error = %e, "Fingerprinting plans tree failed"),
                    }
                }
                joined = async {
                    match &mut in_flight {
                        Some(handle) => handle.await,
                        None => std::future::pending().await,
                    }
                } => {
                    in_flight = None;
                    match joined {
                        Ok(summary) if last.as_ref() != Some(&summary) => {
                            on_change(&summary);
                            last = Some(summary);
                        }
                        Ok(_) => debug!("Plan status unchanged"),
                        Err(e) => warn!(error = %e, "Status recomputation failed"),
                    }
                }
            }
        }

        info!("Stopped watching plans tree");
        Ok(())
    }
}
