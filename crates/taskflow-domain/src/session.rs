//! Ties the view store, task collection, drag controller and derived board
//! together for one board view.

use std::collections::HashMap;
use std::sync::Arc;
use taskflow_core::{
    AllowAll, AppConfig, Authorizer, Clock, EmptyDirectory, LabelDirectory, ResourceKind,
    SystemClock, TaskflowError, TaskflowResult,
};

use crate::board::Board;
use crate::collection::TaskCollection;
use crate::drag::{DragController, DragOutcome, DropTarget, Point};
use crate::query::project_with_accounts;
use crate::sort::{SortDirection, SortKey, SortSpec};
use crate::sync::{StatusUpdate, SyncFailure, SyncOutcome};
use crate::view_store::ViewConfigStore;
use uuid::Uuid;
use crate::{Task, TaskId, TaskStatus};

pub struct BoardSession {
    view: ViewConfigStore,
    collection: TaskCollection,
    drag: DragController,
    board: Board,
    clock: Arc<dyn Clock>,
    accounts: Arc<dyn LabelDirectory>,
    authorizer: Arc<dyn Authorizer>,
    rollback_on_failure: bool,
    // status each failed ticket left its task in
    failed: HashMap<Uuid, TaskStatus>,
}

impl BoardSession {
    pub fn new(collection: TaskCollection) -> Self {
        let mut session = Self {
            view: ViewConfigStore::new(),
            collection,
            drag: DragController::default(),
            board: Board::default(),
            clock: Arc::new(SystemClock),
            accounts: Arc::new(EmptyDirectory),
            authorizer: Arc::new(AllowAll),
            rollback_on_failure: true,
            failed: HashMap::new(),
        };
        session.rebuild();
        session
    }

    /// Apply sort defaults, drag threshold and rollback policy from config.
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.view.set_sort(default_sort(config));
        self.drag = DragController::from_config(config);
        self.rollback_on_failure = config.effective_rollback_on_failure();
        self.rebuild();
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self.rebuild();
        self
    }

    pub fn with_accounts(mut self, accounts: Arc<dyn LabelDirectory>) -> Self {
        self.accounts = accounts;
        self.rebuild();
        self
    }

    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    pub fn with_rollback(mut self, rollback_on_failure: bool) -> Self {
        self.rollback_on_failure = rollback_on_failure;
        self
    }

    pub fn view(&self) -> &ViewConfigStore {
        &self.view
    }

    /// Change the view and re-derive the board.
    pub fn update_view<R>(&mut self, f: impl FnOnce(&mut ViewConfigStore) -> R) -> R {
        let result = f(&mut self.view);
        self.rebuild();
        result
    }

    pub fn collection(&self) -> &TaskCollection {
        &self.collection
    }

    /// Filtered and sorted tasks for the list view.
    pub fn list(&self) -> Vec<&Task> {
        project_with_accounts(
            self.collection.tasks(),
            self.view.config(),
            self.view.sort(),
            self.clock.now(),
            self.accounts.as_ref(),
        )
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Re-derive the board from the collection and the current view.
    pub fn rebuild(&mut self) {
        let board = Board::project(self.list(), self.collection.issues().iter().cloned());
        self.board = board;
    }

    fn authorize(&self, task_id: TaskId) -> TaskflowResult<()> {
        if self.authorizer.can_update(ResourceKind::Task) {
            Ok(())
        } else {
            Err(TaskflowError::Forbidden(format!("cannot move task {}", task_id)))
        }
    }

    /// Keyboard or programmatic drag start.
    pub fn drag_start(&mut self, task_id: TaskId) -> TaskflowResult<()> {
        self.authorize(task_id)?;
        if self.drag.on_drag_start(&self.board, task_id) {
            Ok(())
        } else {
            Err(TaskflowError::NotFound(format!("task {} is not on the board", task_id)))
        }
    }

    pub fn pointer_down(&mut self, task_id: TaskId, at: Point) -> TaskflowResult<()> {
        self.authorize(task_id)?;
        if self.drag.pointer_down(&self.board, task_id, at) {
            Ok(())
        } else {
            Err(TaskflowError::NotFound(format!("task {} is not on the board", task_id)))
        }
    }

    pub fn pointer_move(&mut self, at: Point) -> bool {
        self.drag.pointer_move(at)
    }

    pub fn drag_over(&mut self, target: Option<DropTarget>) {
        self.drag.drag_over(target);
    }

    /// Finish the drag over `target`.
    ///
    /// On a real move the optimistic board and the tentative collection
    /// change are both in place before the returned update is handed to the
    /// store.
    pub fn drag_end(&mut self, target: Option<DropTarget>) -> TaskflowResult<Option<StatusUpdate>> {
        let outcome = self.drag.on_drag_end(target, &self.board);
        self.apply_outcome(outcome)
    }

    /// Pointer release over the last tracked target.
    pub fn release(&mut self) -> TaskflowResult<Option<StatusUpdate>> {
        let outcome = self.drag.drop(&self.board);
        self.apply_outcome(outcome)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    fn apply_outcome(&mut self, outcome: DragOutcome) -> TaskflowResult<Option<StatusUpdate>> {
        match outcome {
            DragOutcome::Cancelled(_) => Ok(None),
            DragOutcome::Dropped { board, change } => {
                let pending = self.collection.apply_tentative(change.task_id, change.to)?;
                self.board = board;
                Ok(Some(pending.update()))
            }
        }
    }

    /// Fold a store result back in. A failure is handed back so the caller
    /// can offer a retry.
    pub fn reconcile(&mut self, outcome: SyncOutcome) -> Option<SyncFailure> {
        match outcome {
            SyncOutcome::Confirmed { update, task } => {
                if self.collection.confirm(update.ticket, task) {
                    self.rebuild();
                }
                None
            }
            SyncOutcome::Failed(failure) => {
                tracing::error!("{}", failure);
                let changed = if self.rollback_on_failure {
                    self.collection.reject(failure.update.ticket).is_some()
                } else {
                    self.collection.settle(failure.update.ticket);
                    false
                };
                if changed {
                    self.rebuild();
                }
                if let Some(task) = self.collection.get(failure.update.task_id) {
                    self.failed.insert(failure.update.ticket, task.status);
                }
                Some(failure)
            }
        }
    }

    /// Reapply a rejected move locally and return a fresh update to dispatch.
    ///
    /// Refused once the task has moved again since the failure was
    /// reconciled, either with a newer write in flight or to another status.
    pub fn retry(&mut self, failure: &SyncFailure) -> TaskflowResult<StatusUpdate> {
        let task_id = failure.update.task_id;
        let left_at = self.failed.get(&failure.update.ticket).copied();
        let current = self.collection.get(task_id).map(|t| t.status);
        if self.collection.is_pending(task_id) || left_at.is_some_and(|s| Some(s) != current) {
            return Err(TaskflowError::Validation(format!(
                "task {} has moved since the failed write",
                task_id
            )));
        }
        self.failed.remove(&failure.update.ticket);
        let pending = self.collection.apply_tentative(task_id, failure.update.status)?;
        self.rebuild();
        Ok(pending.update())
    }

    /// Replace the collection with an authoritative load.
    pub fn refresh(&mut self, collection: TaskCollection) {
        self.collection = collection;
        self.rebuild();
    }
}

fn default_sort(config: &AppConfig) -> SortSpec {
    let fallback = SortSpec::default();
    let key = config
        .effective_default_sort_key()
        .parse::<SortKey>()
        .unwrap_or_else(|e| {
            tracing::warn!("Ignoring default_sort_key: {}", e);
            fallback.key
        });
    let direction = config
        .effective_default_sort_direction()
        .parse::<SortDirection>()
        .unwrap_or_else(|e| {
            tracing::warn!("Ignoring default_sort_direction: {}", e);
            fallback.direction
        });
    SortSpec::new(key, direction)
}
