//! The single in-memory task set and its pending (unconfirmed) moves.

use std::collections::HashMap;
use taskflow_core::{TaskflowError, TaskflowResult};
use uuid::Uuid;

use crate::integrity::{partition_records, IntegrityIssue};
use crate::sync::StatusUpdate;
use crate::task::TaskRecord;
use crate::{Task, TaskId, TaskStatus};

/// A status change applied locally but not yet confirmed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub ticket: Uuid,
    pub task_id: TaskId,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

impl PendingMove {
    pub fn update(&self) -> StatusUpdate {
        StatusUpdate {
            ticket: self.ticket,
            task_id: self.task_id,
            status: self.to,
        }
    }
}

#[derive(Debug, Default)]
pub struct TaskCollection {
    tasks: Vec<Task>,
    // latest pending move per task
    pending: HashMap<TaskId, PendingMove>,
    issues: Vec<IntegrityIssue>,
}

impl TaskCollection {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    /// Decode raw records, keeping the ones that fail validation as issues.
    pub fn from_records(records: impl IntoIterator<Item = TaskRecord>) -> Self {
        let (tasks, issues) = partition_records(records);
        Self {
            tasks,
            pending: HashMap::new(),
            issues,
        }
    }

    pub fn from_parts(tasks: Vec<Task>, issues: Vec<IntegrityIssue>) -> Self {
        Self {
            tasks,
            pending: HashMap::new(),
            issues,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn issues(&self) -> &[IntegrityIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &PendingMove> {
        self.pending.values()
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Apply a status change locally and mark it pending.
    ///
    /// A second move of the same task supersedes the first: only the newest
    /// ticket can confirm or revert it.
    pub fn apply_tentative(&mut self, id: TaskId, to: TaskStatus) -> TaskflowResult<PendingMove> {
        let task = self
            .get_mut(id)
            .ok_or_else(|| TaskflowError::NotFound(format!("task {}", id)))?;
        let from = task.status;
        task.update_status(to);

        let pending = PendingMove {
            ticket: Uuid::new_v4(),
            task_id: id,
            from,
            to,
        };
        self.pending.insert(id, pending);
        Ok(pending)
    }

    fn take_current(&mut self, ticket: Uuid) -> Option<PendingMove> {
        let id = self
            .pending
            .values()
            .find(|p| p.ticket == ticket)
            .map(|p| p.task_id)?;
        self.pending.remove(&id)
    }

    /// The store accepted the write. Returns false for a superseded ticket.
    pub fn confirm(&mut self, ticket: Uuid, authoritative: Option<Task>) -> bool {
        let Some(pending) = self.take_current(ticket) else {
            return false;
        };
        if let Some(task) = authoritative.filter(|t| t.id == pending.task_id) {
            if let Some(slot) = self.get_mut(pending.task_id) {
                *slot = task;
            }
        }
        true
    }

    /// The store rejected the write: restore the status the move started from.
    pub fn reject(&mut self, ticket: Uuid) -> Option<PendingMove> {
        let pending = self.take_current(ticket)?;
        if let Some(task) = self.get_mut(pending.task_id) {
            task.update_status(pending.from);
        }
        tracing::warn!(
            "Reverted task {} from {} back to {}",
            pending.task_id,
            pending.to,
            pending.from
        );
        Some(pending)
    }

    /// Drop the pending marker but keep the optimistic state.
    pub fn settle(&mut self, ticket: Uuid) -> Option<PendingMove> {
        self.take_current(ticket)
    }

    /// Replace everything with an authoritative load.
    pub fn refresh(&mut self, tasks: Vec<Task>, issues: Vec<IntegrityIssue>) {
        self.tasks = tasks;
        self.issues = issues;
        self.pending.clear();
    }
}
