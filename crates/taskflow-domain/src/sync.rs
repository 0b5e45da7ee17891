//! Messages exchanged with whatever executes status writes.

use taskflow_core::TaskflowError;
use thiserror::Error;
use uuid::Uuid;

use crate::{Task, TaskId, TaskStatus};

/// A status write produced by a drop, tagged with the pending move's ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub ticket: Uuid,
    pub task_id: TaskId,
    pub status: TaskStatus,
}

/// A status write the store rejected. Carries the update so it can be retried.
#[derive(Debug, Error)]
#[error("failed to move task {} to {}: {error}", .update.task_id, .update.status)]
pub struct SyncFailure {
    pub update: StatusUpdate,
    #[source]
    pub error: TaskflowError,
}

impl SyncFailure {
    pub fn is_retryable(&self) -> bool {
        self.error.is_retryable()
    }
}

#[derive(Debug)]
pub enum SyncOutcome {
    /// The store accepted the write. `task` is its authoritative copy, if returned.
    Confirmed {
        update: StatusUpdate,
        task: Option<Task>,
    },
    Failed(SyncFailure),
}

impl SyncOutcome {
    pub fn update(&self) -> &StatusUpdate {
        match self {
            Self::Confirmed { update, .. } => update,
            Self::Failed(failure) => &failure.update,
        }
    }
}
