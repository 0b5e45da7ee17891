//! Fire-and-forget execution of drag status writes.
//!
//! `dispatch` returns as soon as the write is spawned; the result arrives
//! later on the outcome channel and is folded back in by
//! `BoardSession::reconcile`.

use std::sync::Arc;
use taskflow_domain::{StatusUpdate, SyncFailure, SyncOutcome, Task};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::traits::TaskStore;

pub struct StatusSync {
    store: Arc<dyn TaskStore>,
    outcomes: mpsc::UnboundedSender<SyncOutcome>,
}

impl StatusSync {
    pub fn new(store: Arc<dyn TaskStore>) -> (Self, mpsc::UnboundedReceiver<SyncOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                store,
                outcomes: tx,
            },
            rx,
        )
    }

    /// Spawn the write. Must be called from within a tokio runtime.
    pub fn dispatch(&self, update: StatusUpdate) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let outcomes = self.outcomes.clone();

        tracing::debug!(
            "Dispatching status write for task {} -> {}",
            update.task_id,
            update.status
        );

        tokio::spawn(async move {
            let outcome = match store.update_status(update.task_id, update.status).await {
                Ok(record) => {
                    let task = match Task::try_from(record) {
                        Ok(task) => Some(task),
                        Err(issue) => {
                            tracing::warn!("Store returned an invalid task: {}", issue.to_error());
                            None
                        }
                    };
                    SyncOutcome::Confirmed { update, task }
                }
                Err(error) => {
                    tracing::warn!("Status write for task {} failed: {}", update.task_id, error);
                    SyncOutcome::Failed(SyncFailure { update, error })
                }
            };

            if outcomes.send(outcome).is_err() {
                tracing::debug!("Sync outcome dropped: receiver closed");
            }
        })
    }

    /// Reissue a write that previously failed.
    pub fn retry(&self, update: StatusUpdate) -> JoinHandle<()> {
        tracing::info!("Retrying status write for task {}", update.task_id);
        self.dispatch(update)
    }
}
