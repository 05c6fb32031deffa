//! Background polling for configuration changes

use aira_repository::ConfigStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Polls a store and reloads it when the source changes
///
/// The task stops on [`stop`](Self::stop) or when the watcher is dropped.
/// Failed reloads are logged and the previous snapshot stays active.
pub struct ConfigWatcher {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
    version: watch::Receiver<u64>,
}

impl ConfigWatcher {
    pub(crate) fn spawn(store: Arc<ConfigStore>, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let (version_tx, version_rx) = watch::channel(store.current().version());

        let handle = tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick completes immediately
            timer.tick().await;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = timer.tick() => {}
                }

                match store.reload_if_changed().await {
                    Ok(Some(snapshot)) => {
                        version_tx.send_replace(snapshot.version());
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(
                            version = store.current().version(),
                            "Configuration reload failed, keeping active snapshot: {}",
                            err
                        );
                    }
                }
            }

            tracing::debug!("Configuration watcher stopped");
        });

        Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
            version: version_rx,
        }
    }

    /// Receiver updated with each newly activated snapshot version
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.clone()
    }

    /// Version of the last snapshot this watcher activated or started with
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Stop polling and wait for the task to finish
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                tracing::warn!("Configuration watcher task failed: {}", err);
            }
        }
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for ConfigWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatcher")
            .field("version", &self.version())
            .field("running", &self.handle.is_some())
            .finish()
    }
}
