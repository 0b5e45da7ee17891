//! Task query functionality.
//!
//! Filters a task collection with a [`ViewConfig`] and orders the survivors
//! with a [`SortSpec`]. Nothing here mutates the input, so the same inputs
//! always produce the same output.

use chrono::{DateTime, Utc};
use std::borrow::Borrow;
use taskflow_core::{EmptyDirectory, LabelDirectory};

use crate::filter::{TaskFilter, TaskPredicate};
use crate::sort::{OrderedSorter, SortSpec};
use crate::view_config::ViewConfig;
use crate::{Task, TaskId};

/// Filter and sort tasks for a list view.
pub fn project<'t, T: Borrow<Task>>(
    tasks: &'t [T],
    config: &ViewConfig,
    sort: SortSpec,
    now: DateTime<Utc>,
) -> Vec<&'t Task> {
    project_with_accounts(tasks, config, sort, now, &EmptyDirectory)
}

/// Same as [`project`], resolving account names for search through `accounts`.
pub fn project_with_accounts<'t, T: Borrow<Task>>(
    tasks: &'t [T],
    config: &ViewConfig,
    sort: SortSpec,
    now: DateTime<Utc>,
    accounts: &dyn LabelDirectory,
) -> Vec<&'t Task> {
    let predicate = TaskPredicate::from_config(config, now, accounts);

    let mut filtered: Vec<&Task> = tasks
        .iter()
        .map(|task| -> &Task { task.borrow() })
        .filter(|task| predicate.matches(task))
        .collect();

    OrderedSorter::new(sort).sort(&mut filtered);
    filtered
}

/// Builder for constructing task queries with a fluent API.
pub struct TaskQueryBuilder<'a, T> {
    tasks: &'a [T],
    config: ViewConfig,
    sort: SortSpec,
    now: Option<DateTime<Utc>>,
    accounts: &'a dyn LabelDirectory,
}

impl<'a, T: Borrow<Task>> TaskQueryBuilder<'a, T> {
    pub fn new(tasks: &'a [T]) -> Self {
        Self {
            tasks,
            config: ViewConfig::default(),
            sort: SortSpec::default(),
            now: None,
            accounts: &EmptyDirectory,
        }
    }

    pub fn config(mut self, config: ViewConfig) -> Self {
        self.config = config;
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Pin "now" for the time-window dimensions (defaults to the wall clock).
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn accounts(mut self, accounts: &'a dyn LabelDirectory) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn execute(self) -> Vec<&'a Task> {
        let now = self.now.unwrap_or_else(Utc::now);
        project_with_accounts(self.tasks, &self.config, self.sort, now, self.accounts)
    }

    /// Execute the query and return matching task IDs in order.
    pub fn execute_ids(self) -> Vec<TaskId> {
        self.execute().iter().map(|t| t.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{SortDirection, SortKey};
    use crate::view_config::DueIn;
    use crate::{TaskPriority, TaskStatus};
    use chrono::{Duration, TimeZone};
    use std::num::NonZeroU32;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn example_tasks() -> Vec<Task> {
        vec![
            Task::new("one", TaskStatus::Todo)
                .with_due_date(now() + Duration::days(3))
                .with_progress(10),
            Task::new("two", TaskStatus::InProgress)
                .with_due_date(now() + Duration::days(10))
                .with_progress(90),
            Task::new("three", TaskStatus::Completed)
                .with_due_date(now() - Duration::days(2))
                .with_progress(100),
        ]
    }

    #[test]
    fn test_due_in_week_with_completed_hidden() {
        let tasks = example_tasks();
        let config = ViewConfig::default()
            .with_show_completed(false)
            .with_due_in(Some(DueIn::weeks(NonZeroU32::new(1).unwrap())));

        let result = project(&tasks, &config, SortSpec::default(), now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "one");
    }

    #[test]
    fn test_sorted_by_default_due_date() {
        let tasks = example_tasks();
        let result = project(&tasks, &ViewConfig::default(), SortSpec::default(), now());
        let titles: Vec<&str> = result.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["three", "one", "two"]);
    }

    #[test]
    fn test_deterministic() {
        let tasks = example_tasks();
        let config = ViewConfig::default().with_search("o");
        let sort = SortSpec::new(SortKey::Progress, SortDirection::Descending);

        let first: Vec<TaskId> = project(&tasks, &config, sort, now()).iter().map(|t| t.id).collect();
        let second: Vec<TaskId> = project(&tasks, &config, sort, now()).iter().map(|t| t.id).collect();
        assert_eq!(first, second);
        assert_eq!(tasks.len(), 3);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let tasks = vec![
            Task::new("a", TaskStatus::Todo).with_priority(TaskPriority::High),
            Task::new("b", TaskStatus::Todo).with_priority(TaskPriority::Low),
            Task::new("c", TaskStatus::Todo).with_priority(TaskPriority::High),
        ];
        let sort = SortSpec::new(SortKey::Priority, SortDirection::Ascending);
        let titles: Vec<&str> = project(&tasks, &ViewConfig::default(), sort, now())
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_query_builder() {
        let tasks = example_tasks();
        let refs: Vec<&Task> = tasks.iter().collect();

        let ids = TaskQueryBuilder::new(&refs)
            .config(ViewConfig::default().with_statuses([TaskStatus::InProgress]))
            .sort(SortSpec::new(SortKey::Title, SortDirection::Ascending))
            .at(now())
            .execute_ids();

        assert_eq!(ids, vec![tasks[1].id]);
    }
}
