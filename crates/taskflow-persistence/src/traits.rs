use async_trait::async_trait;
use chrono::Utc;
use taskflow_core::TaskflowResult;
use taskflow_domain::{TaskId, TaskPriority, TaskRecord, TaskStatus};

/// Partial update applied by [`TaskStore::update`]. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub progress: Option<u8>,
}

impl TaskUpdate {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply to a stored record and stamp `updatedAt`.
    pub fn apply_to(&self, record: &mut TaskRecord) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(status) = self.status {
            record.status = status.label().to_string();
        }
        if let Some(priority) = self.priority {
            record.priority = Some(priority.label().to_string());
        }
        if let Some(progress) = self.progress {
            record.progress = f64::from(progress.min(100));
        }
        record.updated_at = Some(Utc::now().to_rfc3339());
    }
}

/// The external task store.
///
/// Records come back in their loose stored shape so callers can quarantine
/// the ones that fail validation instead of losing them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self) -> TaskflowResult<Vec<TaskRecord>>;

    async fn get(&self, id: TaskId) -> TaskflowResult<Option<TaskRecord>>;

    /// Returns the stored record after the update.
    async fn update(&self, id: TaskId, update: TaskUpdate) -> TaskflowResult<TaskRecord>;

    async fn update_status(&self, id: TaskId, status: TaskStatus) -> TaskflowResult<TaskRecord> {
        self.update(id, TaskUpdate::status(status)).await
    }

    async fn delete(&self, id: TaskId) -> TaskflowResult<()>;
}
