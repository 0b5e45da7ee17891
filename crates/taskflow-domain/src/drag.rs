//! Drag session state machine.
//!
//! `Idle -> Dragging -> (Dropped | Cancelled) -> Idle`. A pointer press only
//! becomes a drag once it has travelled past the activation distance, so a
//! plain click never starts one. Transition functions never touch shared
//! state: a drop returns the optimistic board together with the status
//! change the caller must persist.

use taskflow_core::AppConfig;

use crate::board::Board;
use crate::{TaskId, TaskStatus};

/// Screen position in pixels.
pub type Point = (f32, f32);

/// What the pointer is currently over.
///
/// Resolved in this order: a task (its status), a column id (parsed as a
/// status), then a free-form status hint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropTarget {
    pub task_id: Option<TaskId>,
    pub column_id: Option<String>,
    pub status_hint: Option<String>,
}

impl DropTarget {
    pub fn task(id: TaskId) -> Self {
        Self {
            task_id: Some(id),
            ..Self::default()
        }
    }

    pub fn column(status: TaskStatus) -> Self {
        Self {
            column_id: Some(status.label().to_string()),
            ..Self::default()
        }
    }

    pub fn with_column_id(mut self, column_id: impl Into<String>) -> Self {
        self.column_id = Some(column_id.into());
        self
    }

    pub fn with_status_hint(mut self, hint: impl Into<String>) -> Self {
        self.status_hint = Some(hint.into());
        self
    }

    /// The status this target stands for on `board`, if any.
    pub fn resolve(&self, board: &Board) -> Option<TaskStatus> {
        if let Some((_, status)) = self.task_id.and_then(|id| board.locate(id)) {
            return Some(status);
        }
        if let Some(status) = self.column_id.as_deref().and_then(|c| c.parse().ok()) {
            return Some(status);
        }
        self.status_hint.as_deref().and_then(|h| h.parse().ok())
    }
}

/// The ephemeral record of an active drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub active_task_id: TaskId,
    pub origin_status: TaskStatus,
    pub over: Option<DropTarget>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer is held on a task but has not moved far enough yet.
    Pressed {
        task_id: TaskId,
        origin_status: TaskStatus,
        origin: Point,
    },
    Dragging(DragSession),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    NotDragging,
    NoTarget,
    /// Target resolves to the task's current status.
    SameStatus,
    /// The dragged task is no longer on the board.
    UnknownTask,
    Aborted,
}

/// The status write a drop asks the caller to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub task_id: TaskId,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    Cancelled(CancelReason),
    Dropped { board: Board, change: StatusChange },
}

impl DragOutcome {
    pub fn change(&self) -> Option<StatusChange> {
        match self {
            Self::Dropped { change, .. } => Some(*change),
            Self::Cancelled(_) => None,
        }
    }
}

pub struct DragController {
    state: DragState,
    activation_distance: f32,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(AppConfig::default().effective_drag_activation_distance())
    }
}

impl DragController {
    pub fn new(activation_distance: f32) -> Self {
        Self {
            state: DragState::Idle,
            activation_distance: activation_distance.max(0.0),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.effective_drag_activation_distance())
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Press on a task. Returns false if the task is not on the board.
    pub fn pointer_down(&mut self, board: &Board, task_id: TaskId, at: Point) -> bool {
        let Some((_, origin_status)) = board.locate(task_id) else {
            return false;
        };
        self.state = DragState::Pressed {
            task_id,
            origin_status,
            origin: at,
        };
        true
    }

    /// Returns true once the press has turned into a drag.
    pub fn pointer_move(&mut self, at: Point) -> bool {
        if let DragState::Pressed {
            task_id,
            origin_status,
            origin,
        } = self.state
        {
            let distance = ((at.0 - origin.0).powi(2) + (at.1 - origin.1).powi(2)).sqrt();
            if distance >= self.activation_distance {
                self.begin(task_id, origin_status);
            }
        }
        self.is_dragging()
    }

    /// Keyboard or programmatic start: no activation distance.
    pub fn on_drag_start(&mut self, board: &Board, task_id: TaskId) -> bool {
        let Some((_, origin_status)) = board.locate(task_id) else {
            return false;
        };
        self.begin(task_id, origin_status);
        true
    }

    fn begin(&mut self, task_id: TaskId, origin_status: TaskStatus) {
        tracing::debug!("Drag started for task {} from {}", task_id, origin_status);
        self.state = DragState::Dragging(DragSession {
            active_task_id: task_id,
            origin_status,
            over: None,
        });
    }

    /// Track the current drop target while dragging.
    pub fn drag_over(&mut self, target: Option<DropTarget>) {
        if let DragState::Dragging(session) = &mut self.state {
            session.over = target;
        }
    }

    /// Release the pointer over the last tracked target.
    pub fn drop(&mut self, board: &Board) -> DragOutcome {
        let target = self.session().and_then(|s| s.over.clone());
        self.on_drag_end(target, board)
    }

    /// End the gesture over `target`. The state is `Idle` afterwards.
    pub fn on_drag_end(&mut self, target: Option<DropTarget>, board: &Board) -> DragOutcome {
        let session = match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => session,
            _ => return cancelled(CancelReason::NotDragging),
        };

        let Some(target) = target else {
            return cancelled(CancelReason::NoTarget);
        };
        let Some(to) = target.resolve(board) else {
            return cancelled(CancelReason::NoTarget);
        };
        let Some((_, current)) = board.locate(session.active_task_id) else {
            return cancelled(CancelReason::UnknownTask);
        };
        if to == current {
            return cancelled(CancelReason::SameStatus);
        }

        let Some(next) = board.move_task(session.active_task_id, to) else {
            return cancelled(CancelReason::UnknownTask);
        };
        tracing::debug!(
            "Dropped task {} from {} onto {}",
            session.active_task_id,
            current,
            to
        );
        DragOutcome::Dropped {
            board: next,
            change: StatusChange {
                task_id: session.active_task_id,
                from: current,
                to,
            },
        }
    }

    pub fn cancel(&mut self) -> DragOutcome {
        let was_active = !matches!(std::mem::take(&mut self.state), DragState::Idle);
        if was_active {
            cancelled(CancelReason::Aborted)
        } else {
            cancelled(CancelReason::NotDragging)
        }
    }
}

fn cancelled(reason: CancelReason) -> DragOutcome {
    tracing::debug!("Drag cancelled: {:?}", reason);
    DragOutcome::Cancelled(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Task;

    fn setup() -> (Board, Task, Task) {
        let todo = Task::new("call client", TaskStatus::Todo);
        let doing = Task::new("draft proposal", TaskStatus::InProgress);
        let board = Board::project([&todo, &doing], Vec::new());
        (board, todo, doing)
    }

    #[test]
    fn test_click_does_not_start_drag() {
        let (board, todo, _) = setup();
        let mut drag = DragController::new(8.0);

        assert!(drag.pointer_down(&board, todo.id, (10.0, 10.0)));
        assert!(!drag.pointer_move((12.0, 13.0)));
        let outcome = drag.drop(&board);
        assert_eq!(outcome, DragOutcome::Cancelled(CancelReason::NotDragging));
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_pointer_drag_to_column() {
        let (board, todo, _) = setup();
        let mut drag = DragController::new(8.0);

        drag.pointer_down(&board, todo.id, (0.0, 0.0));
        assert!(drag.pointer_move((6.0, 8.0)));
        drag.drag_over(Some(DropTarget::column(TaskStatus::Completed)));
        let outcome = drag.drop(&board);

        let change = outcome.change().unwrap();
        assert_eq!(change.from, TaskStatus::Todo);
        assert_eq!(change.to, TaskStatus::Completed);
        match outcome {
            DragOutcome::Dropped { board: next, .. } => {
                assert_eq!(next.column(TaskStatus::Completed).count(), 1);
                assert_eq!(next.column(TaskStatus::Todo).count(), 0);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_drop_on_own_status_is_noop() {
        let (board, todo, _) = setup();
        let mut drag = DragController::default();

        drag.on_drag_start(&board, todo.id);
        let outcome = drag.on_drag_end(Some(DropTarget::column(TaskStatus::Todo)), &board);
        assert_eq!(outcome, DragOutcome::Cancelled(CancelReason::SameStatus));
        assert!(outcome.change().is_none());

        drag.on_drag_start(&board, todo.id);
        let outcome = drag.on_drag_end(Some(DropTarget::task(todo.id)), &board);
        assert_eq!(outcome, DragOutcome::Cancelled(CancelReason::SameStatus));
    }

    #[test]
    fn test_task_target_wins_over_column() {
        let (board, todo, doing) = setup();
        let mut drag = DragController::default();

        drag.on_drag_start(&board, todo.id);
        let target = DropTarget::task(doing.id)
            .with_column_id("Cancelled")
            .with_status_hint("Completed");
        let change = drag.on_drag_end(Some(target), &board).change().unwrap();
        assert_eq!(change.to, TaskStatus::InProgress);
    }

    #[test]
    fn test_column_wins_over_hint() {
        let board = setup().0;
        let target = DropTarget::default()
            .with_column_id("cancelled")
            .with_status_hint("Completed");
        assert_eq!(target.resolve(&board), Some(TaskStatus::Cancelled));
    }

    #[test]
    fn test_falls_through_to_hint() {
        let board = setup().0;
        let target = DropTarget::task(uuid::Uuid::new_v4())
            .with_column_id("lane-7")
            .with_status_hint("In Progress");
        assert_eq!(target.resolve(&board), Some(TaskStatus::InProgress));
    }

    #[test]
    fn test_no_target() {
        let (board, todo, _) = setup();
        let mut drag = DragController::default();

        drag.on_drag_start(&board, todo.id);
        assert_eq!(
            drag.on_drag_end(None, &board),
            DragOutcome::Cancelled(CancelReason::NoTarget)
        );

        drag.on_drag_start(&board, todo.id);
        let outcome = drag.on_drag_end(Some(DropTarget::default().with_column_id("x")), &board);
        assert_eq!(outcome, DragOutcome::Cancelled(CancelReason::NoTarget));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let (board, todo, _) = setup();
        let mut drag = DragController::default();

        drag.on_drag_start(&board, todo.id);
        drag.drag_over(Some(DropTarget::column(TaskStatus::Completed)));
        assert_eq!(drag.cancel(), DragOutcome::Cancelled(CancelReason::Aborted));
        assert_eq!(drag.state(), &DragState::Idle);
        assert_eq!(drag.cancel(), DragOutcome::Cancelled(CancelReason::NotDragging));
    }

    #[test]
    fn test_unknown_task_cannot_start() {
        let board = setup().0;
        let mut drag = DragController::default();
        assert!(!drag.on_drag_start(&board, uuid::Uuid::new_v4()));
        assert!(!drag.pointer_down(&board, uuid::Uuid::new_v4(), (0.0, 0.0)));
        assert_eq!(drag.state(), &DragState::Idle);
    }
}
