use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::providers::StructuredLogger;
use crate::services::TokenStore;

/// Periodically purges expired webhook handles from a [`TokenStore`].
#[derive(Clone)]
pub struct HandleSweeper {
    store: Arc<dyn TokenStore + Send + Sync>,
    every: Duration,
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl HandleSweeper {
    pub fn new(store: Arc<dyn TokenStore + Send + Sync>, every: Duration) -> Self {
        Self {
            store,
            every,
            handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Starts the sweep loop, replacing any loop already running.
    pub fn start(&self) {
        self.stop();

        let store = Arc::clone(&self.store);
        let every = self.every.max(Duration::from_secs(1));
        let task = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick fires immediately; nothing can have expired yet.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match store.purge_expired().await {
                    Ok(0) => {}
                    Ok(removed) => StructuredLogger::log_info(
                        &format!("Purged {} expired webhook handles", removed),
                        None,
                        None,
                    ),
                    Err(e) => StructuredLogger::log_error(
                        &format!("Webhook handle sweep failed: {}", e),
                        None,
                    ),
                }
            }
        });

        if let Ok(mut guard) = self.handle.lock() {
            *guard = Some(task);
        }
    }

    pub fn stop(&self) {
        if let Ok(mut guard) = self.handle.lock() {
            if let Some(task) = guard.take() {
                task.abort();
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .lock()
            .map(|guard| guard.as_ref().is_some_and(|task| !task.is_finished()))
            .unwrap_or(false)
    }
}
