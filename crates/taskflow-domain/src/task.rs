use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::integrity::IntegrityIssue;

pub type TaskId = Uuid;

/// Lifecycle state of a task. Variant order is board column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Zero-based board column index.
    pub fn position(self) -> usize {
        match self {
            Self::Todo => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
            Self::Cancelled => 3,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    /// Accepts display labels ("In Progress") and identifiers ("in_progress", "todo").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_token(s);
        if normalized == "todo" {
            return Ok(Self::Todo);
        }
        Self::ALL
            .into_iter()
            .find(|status| status.label().to_lowercase() == normalized)
            .ok_or_else(|| format!("unknown status '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_token(s);
        Self::ALL
            .into_iter()
            .find(|priority| priority.label().to_lowercase() == normalized)
            .ok_or_else(|| format!("unknown priority '{}'", s))
    }
}

fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// A validated unit of work.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// `None` when the stored value was missing or unrecognised.
    pub priority: Option<TaskPriority>,
    /// `None` when the stored value was missing or unparsable.
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: BTreeSet<String>,
    pub account_id: Option<String>,
    pub account_name: Option<String>,
    pub category_id: Option<String>,
    pub tags: BTreeSet<String>,
    pub progress: u8,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(title: impl Into<String>, status: TaskStatus) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            status,
            priority: Some(TaskPriority::Medium),
            due_date: None,
            assigned_to: BTreeSet::new(),
            account_id: None,
            account_name: None,
            category_id: None,
            tags: BTreeSet::new(),
            progress: 0,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = id;
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Overdue means past due and not completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due < now) && self.status != TaskStatus::Completed
    }

    pub fn update_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.updated_at = Some(Utc::now());
    }
}

/// Assignees as stored: a single id or a list of ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssigneeField {
    One(String),
    Many(Vec<String>),
}

impl AssigneeField {
    pub fn into_set(self) -> BTreeSet<String> {
        let ids = match self {
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        };
        ids.into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

/// Loosely typed task as it arrives from a store.
///
/// Every field tolerates `null` or a value of the wrong type by falling back
/// to its default, so one bad field never costs the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<TaskId>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<AssigneeField>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub progress: f64,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose<T> {
    Value(T),
    Other(IgnoredAny),
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(match Loose::<T>::deserialize(deserializer)? {
        Loose::Value(value) => value,
        Loose::Other(_) => T::default(),
    })
}

impl TryFrom<TaskRecord> for Task {
    type Error = IntegrityIssue;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let Some(id) = record.id else {
            return Err(IntegrityIssue::MissingId(record));
        };
        let Ok(status) = record.status.parse::<TaskStatus>() else {
            return Err(IntegrityIssue::UnknownStatus(record));
        };

        Ok(Self {
            id,
            status,
            priority: record.priority.as_deref().and_then(|p| p.parse().ok()),
            due_date: record.due_date.as_deref().and_then(parse_timestamp),
            assigned_to: record
                .assigned_to
                .map(AssigneeField::into_set)
                .unwrap_or_default(),
            tags: record
                .tags
                .into_iter()
                .filter(|tag| !tag.is_empty())
                .collect(),
            progress: clamp_progress(record.progress),
            created_at: record.created_at.as_deref().and_then(parse_timestamp),
            updated_at: record.updated_at.as_deref().and_then(parse_timestamp),
            title: record.title,
            description: record.description,
            account_id: record.account_id,
            account_name: record.account_name,
            category_id: record.category_id,
        })
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.label().to_string(),
            priority: task.priority.map(|p| p.label().to_string()),
            due_date: task.due_date.map(|d| d.to_rfc3339()),
            assigned_to: (!task.assigned_to.is_empty())
                .then(|| AssigneeField::Many(task.assigned_to.iter().cloned().collect())),
            account_id: task.account_id.clone(),
            account_name: task.account_name.clone(),
            category_id: task.category_id.clone(),
            tags: task.tags.iter().cloned().collect(),
            progress: f64::from(task.progress),
            created_at: task.created_at.map(|d| d.to_rfc3339()),
            updated_at: task.updated_at.map(|d| d.to_rfc3339()),
        }
    }
}

fn clamp_progress(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Parse RFC 3339, `YYYY-MM-DDTHH:MM:SS` (as UTC) or `YYYY-MM-DD` (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(status: &str) -> TaskRecord {
        TaskRecord {
            id: Some(Uuid::new_v4()),
            title: "Call Globex".to_string(),
            status: status.to_string(),
            ..TaskRecord::default()
        }
    }

    #[test]
    fn test_status_order_matches_board() {
        let positions: Vec<usize> = TaskStatus::ALL.iter().map(|s| s.position()).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
        assert_eq!(TaskStatus::ALL[1].label(), "In Progress");
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("To Do".parse::<TaskStatus>(), Ok(TaskStatus::Todo));
        assert_eq!("todo".parse::<TaskStatus>(), Ok(TaskStatus::Todo));
        assert_eq!("in_progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("COMPLETED".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert!("Blocked".parse::<TaskStatus>().is_err());
        assert!("".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_labels() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
    }

    #[test]
    fn test_assignees_normalized_to_set() {
        let single: TaskRecord =
            serde_json::from_str(&format!(r#"{{"id":"{}","status":"To Do","assignedTo":"u-1"}}"#, Uuid::new_v4()))
                .unwrap();
        let task = Task::try_from(single).unwrap();
        assert_eq!(task.assigned_to.len(), 1);
        assert!(task.assigned_to.contains("u-1"));

        let many: TaskRecord = serde_json::from_str(&format!(
            r#"{{"id":"{}","status":"To Do","assignedTo":["u-1","u-2","u-1",""]}}"#,
            Uuid::new_v4()
        ))
        .unwrap();
        let task = Task::try_from(many).unwrap();
        assert_eq!(task.assigned_to.len(), 2);
    }

    #[test]
    fn test_unknown_status_is_integrity_issue() {
        let result = Task::try_from(record("Blocked"));
        assert!(matches!(result, Err(IntegrityIssue::UnknownStatus(_))));
    }

    #[test]
    fn test_missing_id_is_integrity_issue() {
        let mut rec = record("To Do");
        rec.id = None;
        assert!(matches!(Task::try_from(rec), Err(IntegrityIssue::MissingId(_))));
    }

    #[test]
    fn test_malformed_fields_degrade_to_none() {
        let mut rec = record("To Do");
        rec.due_date = Some("next tuesday".to_string());
        rec.priority = Some("Urgent".to_string());
        rec.progress = 140.0;

        let task = Task::try_from(rec).unwrap();
        assert_eq!(task.due_date, None);
        assert_eq!(task.priority, None);
        assert_eq!(task.progress, 100);
    }

    #[test]
    fn test_null_and_mistyped_fields_keep_the_task() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"id":"{}","title":"Call","description":null,"status":"To Do","tags":null,
                "progress":10,"dueDate":1718000000,"priority":null,"assignedTo":7,"accountId":null}}"#,
            id
        );
        let rec: TaskRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec.description, "");
        assert!(rec.tags.is_empty());
        assert_eq!(rec.due_date, None);

        let task = Task::try_from(rec).unwrap();
        assert_eq!(task.id, id);
        assert_eq!(task.progress, 10);
        assert_eq!(task.priority, None);
        assert!(task.assigned_to.is_empty());

        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        assert!(crate::filter::matches(&task, &crate::ViewConfig::default(), now));
    }

    #[test]
    fn test_null_title_and_progress_default() {
        let json = format!(
            r#"{{"id":"{}","title":null,"status":"Completed","progress":null}}"#,
            Uuid::new_v4()
        );
        let task = Task::try_from(serde_json::from_str::<TaskRecord>(&json).unwrap()).unwrap();
        assert_eq!(task.title, "");
        assert_eq!(task.progress, 0);
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn test_null_status_is_still_reported() {
        let json = format!(r#"{{"id":"{}","status":null}}"#, Uuid::new_v4());
        let rec: TaskRecord = serde_json::from_str(&json).unwrap();
        assert!(matches!(Task::try_from(rec), Err(IntegrityIssue::UnknownStatus(_))));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T02:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("03/01/2024"), None);
    }

    #[test]
    fn test_record_conversion_keeps_fields() {
        let due = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let mut task = Task::new("Renewal call", TaskStatus::InProgress)
            .with_due_date(due)
            .with_progress(40);
        task.tags.insert("renewal".to_string());
        task.assigned_to.insert("u-9".to_string());

        let back = Task::try_from(TaskRecord::from(&task)).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_is_overdue() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let past = now - chrono::Duration::days(1);

        let open = Task::new("a", TaskStatus::Todo).with_due_date(past);
        assert!(open.is_overdue(now));

        let done = Task::new("b", TaskStatus::Completed).with_due_date(past);
        assert!(!done.is_overdue(now));

        let undated = Task::new("c", TaskStatus::Todo);
        assert!(!undated.is_overdue(now));
    }
}
