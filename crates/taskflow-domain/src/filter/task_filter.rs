//! Per-dimension task filters.
//!
//! Each filter tests one dimension of a task. Filters that depend on dates
//! fail closed: a task without a usable due date never matches them.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use taskflow_core::LabelDirectory;

use crate::search::{CompositeSearcher, TaskSearcher};
use crate::view_config::{DueDateRange, DueIn, ProgressRange};
use crate::{Task, TaskPriority, TaskStatus};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Trait for filtering tasks by various criteria.
pub trait TaskFilter {
    /// Returns true if the task matches the filter criteria.
    fn matches(&self, task: &Task) -> bool;
}

/// Free-text search across title, description and account name.
pub struct SearchFilter<'a> {
    searcher: CompositeSearcher,
    accounts: &'a dyn LabelDirectory,
}

impl<'a> SearchFilter<'a> {
    pub fn new(query: &str, accounts: &'a dyn LabelDirectory) -> Self {
        Self {
            searcher: CompositeSearcher::all(query),
            accounts,
        }
    }
}

impl TaskFilter for SearchFilter<'_> {
    fn matches(&self, task: &Task) -> bool {
        self.searcher.matches(task, self.accounts)
    }
}

/// Match tasks whose status is in the set.
pub struct StatusFilter {
    statuses: BTreeSet<TaskStatus>,
}

impl StatusFilter {
    pub fn new(statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        Self {
            statuses: statuses.into_iter().collect(),
        }
    }
}

impl TaskFilter for StatusFilter {
    fn matches(&self, task: &Task) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&task.status)
    }
}

/// Match tasks whose priority is in the set. Unknown priorities never match.
pub struct PriorityFilter {
    priorities: BTreeSet<TaskPriority>,
}

impl PriorityFilter {
    pub fn new(priorities: impl IntoIterator<Item = TaskPriority>) -> Self {
        Self {
            priorities: priorities.into_iter().collect(),
        }
    }
}

impl TaskFilter for PriorityFilter {
    fn matches(&self, task: &Task) -> bool {
        self.priorities.is_empty()
            || task
                .priority
                .is_some_and(|priority| self.priorities.contains(&priority))
    }
}

/// Match tasks assigned to at least one of the users.
pub struct AssigneeFilter {
    assignees: BTreeSet<String>,
}

impl AssigneeFilter {
    pub fn new(assignees: BTreeSet<String>) -> Self {
        Self { assignees }
    }
}

impl TaskFilter for AssigneeFilter {
    fn matches(&self, task: &Task) -> bool {
        self.assignees.is_empty() || !task.assigned_to.is_disjoint(&self.assignees)
    }
}

/// Match tasks belonging to one of the accounts.
pub struct AccountFilter {
    account_ids: BTreeSet<String>,
}

impl AccountFilter {
    pub fn new(account_ids: BTreeSet<String>) -> Self {
        Self { account_ids }
    }
}

impl TaskFilter for AccountFilter {
    fn matches(&self, task: &Task) -> bool {
        self.account_ids.is_empty()
            || task
                .account_id
                .as_ref()
                .is_some_and(|id| self.account_ids.contains(id))
    }
}

/// Match tasks in one of the categories. A task without a category counts
/// as category `""`.
pub struct CategoryFilter {
    category_ids: BTreeSet<String>,
}

impl CategoryFilter {
    pub fn new(category_ids: BTreeSet<String>) -> Self {
        Self { category_ids }
    }
}

impl TaskFilter for CategoryFilter {
    fn matches(&self, task: &Task) -> bool {
        self.category_ids.is_empty()
            || self
                .category_ids
                .contains(task.category_id.as_deref().unwrap_or(""))
    }
}

/// Match tasks carrying at least one of the tags.
pub struct TagFilter {
    tags: BTreeSet<String>,
}

impl TagFilter {
    pub fn new(tags: BTreeSet<String>) -> Self {
        Self { tags }
    }
}

impl TaskFilter for TagFilter {
    fn matches(&self, task: &Task) -> bool {
        self.tags.is_empty() || !task.tags.is_disjoint(&self.tags)
    }
}

pub struct ProgressFilter {
    range: ProgressRange,
}

impl ProgressFilter {
    pub fn new(range: ProgressRange) -> Self {
        Self { range }
    }
}

impl TaskFilter for ProgressFilter {
    fn matches(&self, task: &Task) -> bool {
        self.range.contains(task.progress)
    }
}

/// Only tasks that are past due and not completed.
pub struct OverdueOnlyFilter {
    now: DateTime<Utc>,
}

impl OverdueOnlyFilter {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl TaskFilter for OverdueOnlyFilter {
    fn matches(&self, task: &Task) -> bool {
        task.is_overdue(self.now)
    }
}

/// Excludes completed tasks.
pub struct HideCompletedFilter;

impl TaskFilter for HideCompletedFilter {
    fn matches(&self, task: &Task) -> bool {
        task.status != TaskStatus::Completed
    }
}

pub struct DueDateRangeFilter {
    range: DueDateRange,
}

impl DueDateRangeFilter {
    pub fn new(range: DueDateRange) -> Self {
        Self { range }
    }
}

impl TaskFilter for DueDateRangeFilter {
    fn matches(&self, task: &Task) -> bool {
        if self.range.is_unbounded() {
            return true;
        }
        task.due_date.is_some_and(|due| self.range.contains(due))
    }
}

/// Tasks due within the next `target_days` whole days.
///
/// Already-overdue tasks (a negative day difference) are excluded even
/// when the overdue toggle would include them.
pub struct DueInFilter {
    now: DateTime<Utc>,
    target_days: i64,
}

impl DueInFilter {
    pub fn new(window: DueIn, now: DateTime<Utc>) -> Self {
        Self {
            now,
            target_days: window.target_days(),
        }
    }
}

impl TaskFilter for DueInFilter {
    fn matches(&self, task: &Task) -> bool {
        let Some(due) = task.due_date else {
            return false;
        };
        let diff_days = days_until(due, self.now);
        (0..=self.target_days).contains(&diff_days)
    }
}

/// Whole days from `now` until `due`, rounded up.
pub fn days_until(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (due - now).num_milliseconds();
    -(-millis).div_euclid(MILLIS_PER_DAY)
}

/// Combine multiple filters with AND logic.
pub struct CompositeFilter<'a> {
    filters: Vec<Box<dyn TaskFilter + 'a>>,
}

impl<'a> CompositeFilter<'a> {
    /// Create an empty composite filter (matches all tasks).
    pub fn new() -> Self {
        Self { filters: vec![] }
    }

    pub fn with_filter(mut self, filter: Box<dyn TaskFilter + 'a>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }
}

impl Default for CompositeFilter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskFilter for CompositeFilter<'_> {
    fn matches(&self, task: &Task) -> bool {
        self.filters.iter().all(|f| f.matches(task))
    }
}
