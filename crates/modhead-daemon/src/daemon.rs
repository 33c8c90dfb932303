//! Daemon setup and lifecycle management

use crate::config::DaemonConfig;
use crate::engine::{open_engine, RuleEngine};
use crate::error::DaemonResult;
use crate::scheduler::{RuleSyncer, SyncEvent};
use crate::storage::{open_store, ProfileStore};
use std::sync::Arc;
use tokio::sync::mpsc;

/// modhead daemon: a profile store, a rule engine and the syncer between them
pub struct Daemon {
    store: Arc<dyn ProfileStore>,
    engine: Arc<dyn RuleEngine>,
    syncer: Arc<RuleSyncer>,
    trigger_rx: mpsc::Receiver<()>,
}

impl Daemon {
    /// Open the configured backends
    pub async fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let store = open_store(&config.storage).await?;
        let engine = open_engine(&config.engine).await?;
        Ok(Self::with_backends(config, store, engine))
    }

    /// Build a daemon around existing backends
    pub fn with_backends(
        config: DaemonConfig,
        store: Arc<dyn ProfileStore>,
        engine: Arc<dyn RuleEngine>,
    ) -> Self {
        let (syncer, trigger_rx) = RuleSyncer::new(config.sync, store.clone(), engine.clone());
        Self {
            store,
            engine,
            syncer,
            trigger_rx,
        }
    }

    pub fn store(&self) -> Arc<dyn ProfileStore> {
        self.store.clone()
    }

    pub fn engine(&self) -> Arc<dyn RuleEngine> {
        self.engine.clone()
    }

    pub fn syncer(&self) -> Arc<RuleSyncer> {
        self.syncer.clone()
    }

    /// Run until Ctrl+C or SIGTERM
    pub async fn run(self) -> DaemonResult<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Run until `shutdown` resolves
    pub async fn run_until(self, shutdown: impl std::future::Future<Output = ()>) -> DaemonResult<()> {
        let syncer = self.syncer.clone();
        let mut events = syncer.events();

        let sync_handle = tokio::spawn(syncer.clone().start(self.trigger_rx));

        let event_handle = tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                if let SyncEvent::InstallFailed { attempt, .. } = &event {
                    tracing::debug!(attempt, "Install retry scheduled");
                }
                tracing::trace!(event = ?event, "Sync event");
            }
        });

        shutdown.await;
        tracing::info!("modhead daemon shutting down");

        self.syncer.stop();
        if let Err(e) = sync_handle.await {
            tracing::error!(error = %e, "Syncer task ended abnormally");
        }
        event_handle.abort();

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
