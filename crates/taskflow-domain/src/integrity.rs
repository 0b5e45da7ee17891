//! Records that could not become valid tasks.
//!
//! These are never dropped silently: loaders keep them and the board
//! projection surfaces them in a separate lane.

use serde::Serialize;
use taskflow_core::TaskflowError;

use crate::task::{Task, TaskRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// Status is outside the four lifecycle values.
    UnknownStatus(TaskRecord),
    MissingId(TaskRecord),
    /// The store returned something that is not a task record at all.
    Malformed { index: usize, message: String },
}

impl IntegrityIssue {
    pub fn record(&self) -> Option<&TaskRecord> {
        match self {
            Self::UnknownStatus(record) | Self::MissingId(record) => Some(record),
            Self::Malformed { .. } => None,
        }
    }

    pub fn to_error(&self) -> TaskflowError {
        match self {
            Self::UnknownStatus(record) => TaskflowError::DataIntegrity {
                task_id: record.id.map(|id| id.to_string()).unwrap_or_default(),
                status: record.status.clone(),
            },
            Self::MissingId(record) => {
                TaskflowError::Validation(format!("task '{}' has no id", record.title))
            }
            Self::Malformed { index, message } => {
                TaskflowError::Serialization(format!("record {}: {}", index, message))
            }
        }
    }
}

/// Split records into valid tasks and integrity issues, logging each issue.
pub fn partition_records(
    records: impl IntoIterator<Item = TaskRecord>,
) -> (Vec<Task>, Vec<IntegrityIssue>) {
    let mut tasks = Vec::new();
    let mut issues = Vec::new();
    for record in records {
        match Task::try_from(record) {
            Ok(task) => tasks.push(task),
            Err(issue) => {
                tracing::warn!("Quarantined task record: {}", issue.to_error());
                issues.push(issue);
            }
        }
    }
    (tasks, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_partition_keeps_bad_records() {
        let good = TaskRecord {
            id: Some(Uuid::new_v4()),
            status: "To Do".to_string(),
            ..TaskRecord::default()
        };
        let bad = TaskRecord {
            id: Some(Uuid::new_v4()),
            status: "Waiting".to_string(),
            ..TaskRecord::default()
        };

        let (tasks, issues) = partition_records(vec![good, bad.clone()]);
        assert_eq!(tasks.len(), 1);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].record(), Some(&bad));
        assert!(matches!(
            issues[0].to_error(),
            TaskflowError::DataIntegrity { ref status, .. } if status == "Waiting"
        ));
    }
}
