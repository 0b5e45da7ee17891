//! Task filtering functionality.
//!
//! A [`ViewConfig`] is compiled into a [`TaskPredicate`]: one filter per
//! active dimension, combined with AND. Within a multi-valued dimension
//! membership is OR.

pub mod task_filter;

pub use task_filter::{
    days_until, AccountFilter, AssigneeFilter, CategoryFilter, CompositeFilter,
    DueDateRangeFilter, DueInFilter, HideCompletedFilter, OverdueOnlyFilter, PriorityFilter,
    ProgressFilter, SearchFilter, StatusFilter, TagFilter, TaskFilter,
};

use chrono::{DateTime, Utc};
use taskflow_core::{EmptyDirectory, LabelDirectory};

use crate::view_config::ViewConfig;
use crate::Task;

/// A compiled view configuration.
pub struct TaskPredicate<'a> {
    filter: CompositeFilter<'a>,
}

impl<'a> TaskPredicate<'a> {
    /// Build a predicate from every non-default dimension of `config`.
    pub fn from_config(
        config: &ViewConfig,
        now: DateTime<Utc>,
        accounts: &'a dyn LabelDirectory,
    ) -> Self {
        let mut filter = CompositeFilter::new();

        if !config.search.is_empty() {
            filter = filter.with_filter(Box::new(SearchFilter::new(&config.search, accounts)));
        }
        if !config.statuses.is_empty() {
            filter = filter.with_filter(Box::new(StatusFilter::new(config.statuses.iter().copied())));
        }
        if !config.priorities.is_empty() {
            filter = filter.with_filter(Box::new(PriorityFilter::new(
                config.priorities.iter().copied(),
            )));
        }
        if !config.assignees.is_empty() {
            filter = filter.with_filter(Box::new(AssigneeFilter::new(config.assignees.clone())));
        }
        if !config.account_ids.is_empty() {
            filter = filter.with_filter(Box::new(AccountFilter::new(config.account_ids.clone())));
        }
        if !config.category_ids.is_empty() {
            filter = filter.with_filter(Box::new(CategoryFilter::new(config.category_ids.clone())));
        }
        if !config.tags.is_empty() {
            filter = filter.with_filter(Box::new(TagFilter::new(config.tags.clone())));
        }
        if !config.progress.is_full() {
            filter = filter.with_filter(Box::new(ProgressFilter::new(config.progress)));
        }
        if config.show_overdue {
            filter = filter.with_filter(Box::new(OverdueOnlyFilter::new(now)));
        }
        if !config.show_completed {
            filter = filter.with_filter(Box::new(HideCompletedFilter));
        }
        if let Some(range) = config.due_range.filter(|r| !r.is_unbounded()) {
            filter = filter.with_filter(Box::new(DueDateRangeFilter::new(range)));
        }
        if let Some(window) = config.due_in {
            filter = filter.with_filter(Box::new(DueInFilter::new(window, now)));
        }

        Self { filter }
    }

    /// Number of active dimensions.
    pub fn active_dimensions(&self) -> usize {
        self.filter.len()
    }
}

impl TaskFilter for TaskPredicate<'_> {
    fn matches(&self, task: &Task) -> bool {
        self.filter.matches(task)
    }
}

/// Evaluate one task against a view configuration.
pub fn matches(task: &Task, config: &ViewConfig, now: DateTime<Utc>) -> bool {
    TaskPredicate::from_config(config, now, &EmptyDirectory).matches(task)
}

/// Same as [`matches`], resolving account names through a directory for search.
pub fn matches_with_accounts(
    task: &Task,
    config: &ViewConfig,
    now: DateTime<Utc>,
    accounts: &dyn LabelDirectory,
) -> bool {
    TaskPredicate::from_config(config, now, accounts).matches(task)
}
