use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taskflow_core::{TaskflowError, TaskflowResult};
use taskflow_domain::{IntegrityIssue, TaskId, TaskRecord};
use tokio::sync::Mutex;

use crate::store::atomic_writer::AtomicWriter;
use crate::traits::{TaskStore, TaskUpdate};

pub const FORMAT_VERSION: u32 = 1;

/// On-disk layout of a task file.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEnvelope<T> {
    pub version: u32,
    pub tasks: T,
}

/// Task store backed by a single JSON file.
#[derive(Debug)]
pub struct JsonFileTaskStore {
    path: PathBuf,
    // serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl JsonFileTaskStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record, reporting entries that are not task records at all.
    ///
    /// A missing file is an empty store. Both the versioned envelope and a
    /// bare JSON array are accepted.
    pub async fn load_records(&self) -> TaskflowResult<(Vec<TaskRecord>, Vec<IntegrityIssue>)> {
        let Some(bytes) = AtomicWriter::read_if_exists(&self.path).await? else {
            tracing::info!("No task file at {}, starting empty", self.path.display());
            return Ok((Vec::new(), Vec::new()));
        };

        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| TaskflowError::Serialization(e.to_string()))?;
        let raw = match value {
            serde_json::Value::Array(items) => items,
            other => {
                let envelope: JsonEnvelope<Vec<serde_json::Value>> =
                    serde_json::from_value(other)
                        .map_err(|e| TaskflowError::Serialization(e.to_string()))?;
                if envelope.version != FORMAT_VERSION {
                    return Err(TaskflowError::Serialization(format!(
                        "Unsupported format version: {}",
                        envelope.version
                    )));
                }
                envelope.tasks
            }
        };

        let mut records = Vec::with_capacity(raw.len());
        let mut issues = Vec::new();
        for (index, item) in raw.into_iter().enumerate() {
            match serde_json::from_value::<TaskRecord>(item) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping malformed task record {}: {}", index, e);
                    issues.push(IntegrityIssue::Malformed {
                        index,
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Loaded {} task records from {}",
            records.len(),
            self.path.display()
        );
        Ok((records, issues))
    }

    pub async fn save_records(&self, records: &[TaskRecord]) -> TaskflowResult<()> {
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            tasks: records,
        };
        let json_bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| TaskflowError::Serialization(e.to_string()))?;

        AtomicWriter::write_atomic(&self.path, &json_bytes).await?;

        tracing::info!(
            "Saved {} task records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn modify<R>(
        &self,
        f: impl FnOnce(&mut Vec<TaskRecord>) -> TaskflowResult<R> + Send,
    ) -> TaskflowResult<R> {
        let _guard = self.write_lock.lock().await;
        let (mut records, issues) = self.load_records().await?;
        if !issues.is_empty() {
            // a rewrite would drop the unreadable entries
            return Err(TaskflowError::Persistence(format!(
                "{} has {} unreadable record(s); refusing to rewrite it",
                self.path.display(),
                issues.len()
            )));
        }
        let result = f(&mut records)?;
        self.save_records(&records).await?;
        Ok(result)
    }
}

#[async_trait]
impl TaskStore for JsonFileTaskStore {
    async fn list(&self) -> TaskflowResult<Vec<TaskRecord>> {
        Ok(self.load_records().await?.0)
    }

    async fn get(&self, id: TaskId) -> TaskflowResult<Option<TaskRecord>> {
        let records = self.list().await?;
        Ok(records.into_iter().find(|r| r.id == Some(id)))
    }

    async fn update(&self, id: TaskId, update: TaskUpdate) -> TaskflowResult<TaskRecord> {
        self.modify(move |records| {
            let record = records
                .iter_mut()
                .find(|r| r.id == Some(id))
                .ok_or_else(|| TaskflowError::NotFound(format!("task {}", id)))?;
            update.apply_to(record);
            Ok(record.clone())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskflowResult<()> {
        self.modify(move |records| {
            let before = records.len();
            records.retain(|r| r.id != Some(id));
            if records.len() == before {
                return Err(TaskflowError::NotFound(format!("task {}", id)));
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taskflow_domain::TaskStatus;
    use tempfile::tempdir;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileTaskStore::new(dir.path().join("tasks.json"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_persists() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tasks.json");
        let id = Uuid::new_v4();
        let data = json!({
            "version": 1,
            "tasks": [{ "id": id, "title": "Call Acme", "status": "To Do", "assignedTo": "u1" }]
        });
        std::fs::write(&file_path, serde_json::to_vec(&data).unwrap()).unwrap();

        let store = JsonFileTaskStore::new(&file_path);
        let updated = store.update_status(id, TaskStatus::InProgress).await.unwrap();
        assert_eq!(updated.status, "In Progress");

        let reopened = JsonFileTaskStore::new(&file_path);
        let record = reopened.get(id).await.unwrap().unwrap();
        assert_eq!(record.status, "In Progress");
        assert_eq!(record.title, "Call Acme");
    }

    #[tokio::test]
    async fn test_bare_array_and_malformed_entries() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tasks.json");
        let data = json!([
            { "id": Uuid::new_v4(), "title": "ok", "status": "Completed" },
            "not a task",
            { "id": Uuid::new_v4(), "title": "odd status", "status": "Waiting" }
        ]);
        std::fs::write(&file_path, serde_json::to_vec(&data).unwrap()).unwrap();

        let store = JsonFileTaskStore::new(&file_path);
        let (records, issues) = store.load_records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], IntegrityIssue::Malformed { index: 1, .. }));

        let err = store.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, TaskflowError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_null_fields_do_not_drop_record() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tasks.json");
        let id = Uuid::new_v4();
        let data = json!({
            "version": 1,
            "tasks": [{
                "id": id,
                "title": "Call",
                "description": null,
                "status": "To Do",
                "tags": null,
                "progress": 10
            }]
        });
        std::fs::write(&file_path, serde_json::to_vec(&data).unwrap()).unwrap();

        let store = JsonFileTaskStore::new(&file_path);
        let (records, issues) = store.load_records().await.unwrap();
        assert!(issues.is_empty());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(id));

        let updated = store.update_status(id, TaskStatus::Completed).await.unwrap();
        assert_eq!(updated.status, "Completed");
    }

    #[tokio::test]
    async fn test_unsupported_version() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tasks.json");
        std::fs::write(&file_path, br#"{"version": 9, "tasks": []}"#).unwrap();

        let err = JsonFileTaskStore::new(&file_path).list().await.unwrap_err();
        assert!(matches!(err, TaskflowError::Serialization(_)));
    }
}
