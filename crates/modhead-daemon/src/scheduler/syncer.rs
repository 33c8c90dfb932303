//! Sync loop: keep the engine's rules equal to `compile(store)`

use super::events::{SyncEvent, SyncReport};
use crate::config::SyncConfig;
use crate::engine::RuleEngine;
use crate::error::DaemonResult;
use crate::storage::ProfileStore;
use modhead_compiler::compile_with_summary;
use modhead_types::ProfileList;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

/// Recompiles and reinstalls rules whenever the profile store changes.
///
/// Installs run on a single task, one at a time. Snapshots published while
/// an install is in flight collapse into one follow-up install of the latest
/// list. A failed install is retried with backoff, again from the latest
/// list.
pub struct RuleSyncer {
    config: SyncConfig,
    store: Arc<dyn ProfileStore>,
    engine: Arc<dyn RuleEngine>,
    event_tx: broadcast::Sender<SyncEvent>,
    trigger_tx: mpsc::Sender<()>,
    shutdown_tx: watch::Sender<bool>,
}

impl RuleSyncer {
    /// Create a new syncer
    pub fn new(
        config: SyncConfig,
        store: Arc<dyn ProfileStore>,
        engine: Arc<dyn RuleEngine>,
    ) -> (Arc<Self>, mpsc::Receiver<()>) {
        let (event_tx, _) = broadcast::channel(config.event_buffer.max(1));
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let (shutdown_tx, _) = watch::channel(false);

        let syncer = Arc::new(Self {
            config,
            store,
            engine,
            event_tx,
            trigger_tx,
            shutdown_tx,
        });

        (syncer, trigger_rx)
    }

    /// Subscribe to sync events
    pub fn events(&self) -> broadcast::Receiver<SyncEvent> {
        self.event_tx.subscribe()
    }

    /// Request a resync from the current snapshot
    pub fn trigger(&self) {
        // A full channel already has a resync queued.
        let _ = self.trigger_tx.try_send(());
    }

    /// Stop the loop started by [`RuleSyncer::start`]
    pub fn stop(&self) {
        self.shutdown_tx.send_replace(true);
    }

    /// Compile `profiles` and replace every installed rule with the result.
    pub async fn sync(&self, profiles: &ProfileList) -> DaemonResult<SyncReport> {
        let summary = compile_with_summary(profiles);
        let installed_ids = self.engine.installed_rule_ids().await?;
        let installed = summary.rules.len();

        tracing::debug!(
            profiles = profiles.len(),
            remove = installed_ids.len(),
            add = installed,
            "Replacing installed rules"
        );

        self.engine
            .update_rules(&installed_ids, summary.rules)
            .await?;

        Ok(SyncReport {
            removed: installed_ids.len(),
            installed,
            skipped: summary.skipped.len(),
            completed_at: chrono::Utc::now(),
        })
    }

    /// Run the loop until [`RuleSyncer::stop`] is called.
    pub async fn start(self: Arc<Self>, mut trigger_rx: mpsc::Receiver<()>) {
        let mut profiles_rx = self.store.subscribe();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let poll_period = self.config.poll_interval();
        let mut poll = interval(poll_period.unwrap_or(std::time::Duration::from_secs(3600)));
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut pending = true;
        let mut attempt: u32 = 0;
        let mut retry_at: Option<Instant> = None;

        tracing::info!("Rule syncer started");

        loop {
            if *shutdown_rx.borrow_and_update() {
                break;
            }

            if pending && retry_at.map_or(true, |at| Instant::now() >= at) {
                let snapshot = profiles_rx.borrow_and_update().clone();
                match self.sync(&snapshot).await {
                    Ok(report) => {
                        tracing::info!(
                            installed = report.installed,
                            removed = report.removed,
                            skipped = report.skipped,
                            "Rules installed"
                        );
                        self.emit(SyncEvent::RulesInstalled(report));
                        pending = false;
                        attempt = 0;
                        retry_at = None;
                    }
                    Err(e) => {
                        attempt = attempt.saturating_add(1);
                        let delay = self.config.retry_delay(attempt);
                        tracing::error!(
                            error = %e,
                            attempt,
                            retry_in_ms = delay.as_millis() as u64,
                            "Rule install failed; previous rules kept"
                        );
                        self.emit(SyncEvent::InstallFailed {
                            reason: e.to_string(),
                            attempt,
                            retry_in_ms: delay.as_millis() as u64,
                            at: chrono::Utc::now(),
                        });
                        retry_at = Some(Instant::now() + delay);
                    }
                }
            }

            let retry_deadline = retry_at.unwrap_or_else(Instant::now);

            tokio::select! {
                changed = profiles_rx.changed() => {
                    if changed.is_err() {
                        tracing::warn!("Profile store closed");
                        break;
                    }
                    pending = true;
                    retry_at = None;
                }
                Some(_) = trigger_rx.recv() => {
                    tracing::debug!("Resync requested");
                    pending = true;
                    retry_at = None;
                }
                _ = sleep_until(retry_deadline), if pending && retry_at.is_some() => {}
                _ = poll.tick(), if poll_period.is_some() => {
                    if let Err(e) = self.store.refresh().await {
                        tracing::warn!(error = %e, "Failed to refresh profile store");
                    }
                }
                _ = shutdown_rx.changed() => {}
            }
        }

        tracing::info!("Rule syncer stopped");
    }

    fn emit(&self, event: SyncEvent) {
        let _ = self.event_tx.send(event);
    }
}
