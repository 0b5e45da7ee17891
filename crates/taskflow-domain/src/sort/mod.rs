//! Task ordering.
//!
//! Every sort key is projected to a [`SortValue`]. Text compares
//! case-insensitively, numbers numerically, and anything else as instants
//! with a stringified tiebreak so the order stays total. Sorting uses the
//! stable slice sort, so ties keep their incoming order.

use chrono::{DateTime, Utc};
use std::borrow::{Borrow, Cow};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::task::{parse_timestamp, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
    Progress,
    AccountId,
    AccountName,
    CategoryId,
    AssignedTo,
    Tags,
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::DueDate => "due_date",
            Self::Progress => "progress",
            Self::AccountId => "account_id",
            Self::AccountName => "account_name",
            Self::CategoryId => "category_id",
            Self::AssignedTo => "assigned_to",
            Self::Tags => "tags",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    /// Project a task onto the value this key sorts by.
    pub fn value_of<'a>(self, task: &'a Task) -> SortValue<'a> {
        match self {
            Self::Title => SortValue::Text(Cow::Borrowed(&task.title)),
            Self::Description => SortValue::Text(Cow::Borrowed(&task.description)),
            Self::Status => SortValue::Text(Cow::Borrowed(task.status.label())),
            Self::Priority => task
                .priority
                .map_or(SortValue::Missing, |p| SortValue::Text(Cow::Borrowed(p.label()))),
            Self::DueDate => SortValue::Instant(task.due_date),
            Self::Progress => SortValue::Number(i64::from(task.progress)),
            Self::AccountId => optional_text(task.account_id.as_deref()),
            Self::AccountName => optional_text(task.account_name.as_deref()),
            Self::CategoryId => optional_text(task.category_id.as_deref()),
            Self::AssignedTo => SortValue::List(join(task.assigned_to.iter())),
            Self::Tags => SortValue::List(join(task.tags.iter())),
            Self::CreatedAt => SortValue::Instant(task.created_at),
            Self::UpdatedAt => SortValue::Instant(task.updated_at),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        let key = match normalized.as_str() {
            "title" => Self::Title,
            "description" => Self::Description,
            "status" => Self::Status,
            "priority" => Self::Priority,
            "duedate" | "due" => Self::DueDate,
            "progress" => Self::Progress,
            "accountid" | "account" => Self::AccountId,
            "accountname" => Self::AccountName,
            "categoryid" | "category" => Self::CategoryId,
            "assignedto" | "assignee" => Self::AssignedTo,
            "tags" => Self::Tags,
            "createdat" => Self::CreatedAt,
            "updatedat" => Self::UpdatedAt,
            _ => return Err(format!("unknown sort key '{}'", s)),
        };
        Ok(key)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// The single active sort key and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Sorting by the active key flips direction; a new key starts ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.flipped())
        } else {
            Self::new(key, SortDirection::Ascending)
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(SortKey::DueDate, SortDirection::Ascending)
    }
}

/// A field value as seen by the comparator.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    Text(Cow<'a, str>),
    Number(i64),
    Instant(Option<DateTime<Utc>>),
    List(String),
    Missing,
}

impl SortValue<'_> {
    /// No value to order by: a missing field or an absent timestamp.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Missing | Self::Instant(None))
    }

    fn as_instant(&self) -> Option<i64> {
        match self {
            Self::Instant(instant) => instant.map(|t| t.timestamp_millis()),
            Self::Text(text) => parse_timestamp(text).map(|t| t.timestamp_millis()),
            Self::Number(n) => Some(*n),
            Self::List(_) | Self::Missing => None,
        }
    }

    fn stringify(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(&**text),
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Instant(instant) => Cow::Owned(instant.map(|t| t.to_rfc3339()).unwrap_or_default()),
            Self::List(joined) => Cow::Borrowed(joined.as_str()),
            Self::Missing => Cow::Borrowed(""),
        }
    }
}

fn optional_text(value: Option<&str>) -> SortValue<'_> {
    value.map_or(SortValue::Missing, |v| SortValue::Text(Cow::Borrowed(v)))
}

fn join<'a>(items: impl Iterator<Item = &'a String>) -> String {
    items.map(String::as_str).collect::<Vec<_>>().join(",")
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Total order over sort values, ascending.
pub fn compare_values(a: &SortValue<'_>, b: &SortValue<'_>) -> Ordering {
    match (a, b) {
        (SortValue::Text(x), SortValue::Text(y)) => compare_text(x, y),
        (SortValue::Number(x), SortValue::Number(y)) => x.cmp(y),
        (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
        (SortValue::Missing, _) => Ordering::Greater,
        (_, SortValue::Missing) => Ordering::Less,
        _ => {
            let by_instant = match (a.as_instant(), b.as_instant()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_instant.then_with(|| a.stringify().cmp(&b.stringify()))
        }
    }
}

/// Compare two tasks under a sort spec.
///
/// Absent values sort last whichever the direction; only present values
/// are reordered by it.
pub fn compare(a: &Task, b: &Task, spec: SortSpec) -> Ordering {
    let (x, y) = (spec.key.value_of(a), spec.key.value_of(b));
    match (x.is_absent(), y.is_absent()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => spec.direction.apply(compare_values(&x, &y)),
    }
}

/// Applies a [`SortSpec`] to slices of tasks.
pub struct OrderedSorter {
    spec: SortSpec,
}

impl OrderedSorter {
    pub fn new(spec: SortSpec) -> Self {
        Self { spec }
    }

    /// Stable in-place sort. Works with both `&Task` and `Task` elements.
    pub fn sort<T: Borrow<Task>>(&self, tasks: &mut [T]) {
        tasks.sort_by(|a, b| compare(a.borrow(), b.borrow(), self.spec));
    }
}
