//! Board projection: one column per lifecycle status.

use serde::Serialize;
use std::borrow::Borrow;

use crate::integrity::IntegrityIssue;
use crate::{Task, TaskId, TaskStatus};

/// Tasks sharing one status, in pipeline order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            status,
            tasks: Vec::new(),
        }
    }

    /// Badge count.
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }
}

/// The derived board. Never persisted; rebuilt whenever tasks or the view change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Board {
    /// Always `TaskStatus::ALL.len()` columns in `TaskStatus::ALL` order.
    pub columns: Vec<Column>,
    /// Records whose status is outside the enumeration. Shown apart, never dropped.
    pub unrecognized: Vec<IntegrityIssue>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            columns: TaskStatus::ALL.iter().copied().map(Column::new).collect(),
            unrecognized: Vec::new(),
        }
    }
}

impl Board {
    /// Bucket already filtered and sorted tasks into columns.
    pub fn project<T: Borrow<Task>>(
        ordered: impl IntoIterator<Item = T>,
        issues: impl IntoIterator<Item = IntegrityIssue>,
    ) -> Self {
        let mut board = Self::default();
        for task in ordered {
            let task: &Task = task.borrow();
            board.columns[task.status.position()].tasks.push(task.clone());
        }
        board.unrecognized = issues.into_iter().collect();
        if !board.unrecognized.is_empty() {
            tracing::debug!(
                "Board has {} task(s) with unrecognized status",
                board.unrecognized.len()
            );
        }
        board
    }

    pub fn column(&self, status: TaskStatus) -> &Column {
        &self.columns[status.position()]
    }

    /// Find a task and the status of the column holding it.
    pub fn locate(&self, id: TaskId) -> Option<(&Task, TaskStatus)> {
        self.columns.iter().find_map(|column| {
            column
                .tasks
                .iter()
                .find(|t| t.id == id)
                .map(|t| (t, column.status))
        })
    }

    /// Tasks across all regular columns.
    pub fn total(&self) -> usize {
        self.columns.iter().map(Column::count).sum()
    }

    /// Optimistic move: remove `id` from every column and append it to
    /// `target` with its status updated. Returns `None` if the task is not
    /// on the board.
    pub fn move_task(&self, id: TaskId, target: TaskStatus) -> Option<Board> {
        let (task, _) = self.locate(id)?;
        let mut moved = task.clone();
        moved.update_status(target);

        let mut next = self.clone();
        for column in &mut next.columns {
            column.tasks.retain(|t| t.id != id);
        }
        next.columns[target.position()].tasks.push(moved);
        Some(next)
    }
}

/// Free-function form of [`Board::project`] for valid tasks only.
pub fn project_to_columns<T: Borrow<Task>>(ordered: impl IntoIterator<Item = T>) -> Vec<Column> {
    Board::project(ordered, std::iter::empty()).columns
}
