pub mod board;
pub mod collection;
pub mod drag;
pub mod filter;
pub mod history;
pub mod integrity;
pub mod query;
pub mod search;
pub mod session;
pub mod sort;
pub mod sync;
pub mod task;
pub mod view_config;
pub mod view_store;

pub use board::{project_to_columns, Board, Column};
pub use collection::{PendingMove, TaskCollection};
pub use drag::{
    CancelReason, DragController, DragOutcome, DragSession, DragState, DropTarget, Point,
    StatusChange,
};
pub use filter::{matches, matches_with_accounts, TaskFilter, TaskPredicate};
pub use history::HistoryManager;
pub use integrity::{partition_records, IntegrityIssue};
pub use query::{project, project_with_accounts, TaskQueryBuilder};
pub use session::BoardSession;
pub use sort::{compare, OrderedSorter, SortDirection, SortKey, SortSpec};
pub use sync::{StatusUpdate, SyncFailure, SyncOutcome};
pub use task::{parse_timestamp, AssigneeField, Task, TaskId, TaskPriority, TaskRecord, TaskStatus};
pub use view_config::{DueDateRange, DueIn, DueUnit, ProgressRange, ViewConfig};
pub use view_store::ViewConfigStore;
