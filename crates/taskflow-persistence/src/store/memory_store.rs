use async_trait::async_trait;
use taskflow_core::{TaskflowError, TaskflowResult};
use taskflow_domain::{TaskId, TaskRecord};
use tokio::sync::RwLock;

use crate::traits::{TaskStore, TaskUpdate};

/// Task store held in memory. Used by tests and as a local cache.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    records: RwLock<Vec<TaskRecord>>,
}

impl InMemoryTaskStore {
    pub fn new(records: Vec<TaskRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list(&self) -> TaskflowResult<Vec<TaskRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn get(&self, id: TaskId) -> TaskflowResult<Option<TaskRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == Some(id)).cloned())
    }

    async fn update(&self, id: TaskId, update: TaskUpdate) -> TaskflowResult<TaskRecord> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == Some(id))
            .ok_or_else(|| TaskflowError::NotFound(format!("task {}", id)))?;
        update.apply_to(record);
        Ok(record.clone())
    }

    async fn delete(&self, id: TaskId) -> TaskflowResult<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != Some(id));
        if records.len() == before {
            return Err(TaskflowError::NotFound(format!("task {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskflow_domain::TaskStatus;
    use uuid::Uuid;

    fn record(status: &str) -> TaskRecord {
        TaskRecord {
            id: Some(Uuid::new_v4()),
            title: "Send quote".to_string(),
            status: status.to_string(),
            ..TaskRecord::default()
        }
    }

    #[tokio::test]
    async fn test_update_status() {
        let original = record("To Do");
        let id = original.id.unwrap();
        let store = InMemoryTaskStore::new(vec![original]);

        let updated = store.update_status(id, TaskStatus::Completed).await.unwrap();
        assert_eq!(updated.status, "Completed");

        let stored = store.get(id).await.unwrap().unwrap();
        assert_eq!(stored.status, "Completed");
    }

    #[tokio::test]
    async fn test_missing_task() {
        let store = InMemoryTaskStore::default();
        let err = store
            .update_status(Uuid::new_v4(), TaskStatus::Todo)
            .await
            .unwrap_err();
        assert!(matches!(err, TaskflowError::NotFound(_)));
        assert!(store.delete(Uuid::new_v4()).await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let original = record("In Progress");
        let id = original.id.unwrap();
        let store = InMemoryTaskStore::new(vec![original, record("To Do")]);

        store.delete(id).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(store.get(id).await.unwrap().is_none());
    }
}
