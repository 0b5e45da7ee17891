//! Holder of the active [`ViewConfig`] and [`SortSpec`] for one view.

use crate::history::HistoryManager;
use crate::sort::{SortKey, SortSpec};
use crate::task::{TaskPriority, TaskStatus};
use crate::view_config::{DueDateRange, DueIn, ProgressRange, ViewConfig};

/// Mutable container for one view's filter and sort selection.
///
/// Each setter replaces exactly one dimension through the matching
/// `ViewConfig::with_*` transform. Effective changes are recorded so the
/// selection can be undone.
#[derive(Debug, Clone, Default)]
pub struct ViewConfigStore {
    config: ViewConfig,
    sort: SortSpec,
    history: HistoryManager<ViewConfig>,
}

impl ViewConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort(sort: SortSpec) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    /// Replace the whole config. Returns false when nothing changed.
    pub fn replace(&mut self, next: ViewConfig) -> bool {
        if next == self.config {
            return false;
        }
        let previous = std::mem::replace(&mut self.config, next);
        self.history.capture_before_change(previous);
        true
    }

    fn update(&mut self, transform: impl FnOnce(ViewConfig) -> ViewConfig) -> bool {
        let next = transform(self.config.clone());
        self.replace(next)
    }

    pub fn set_search(&mut self, search: impl Into<String>) -> bool {
        let search = search.into();
        self.update(|c| c.with_search(search))
    }

    pub fn set_statuses(&mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> bool {
        self.update(|c| c.with_statuses(statuses))
    }

    pub fn set_priorities(&mut self, priorities: impl IntoIterator<Item = TaskPriority>) -> bool {
        self.update(|c| c.with_priorities(priorities))
    }

    pub fn set_assignees<S: Into<String>>(&mut self, ids: impl IntoIterator<Item = S>) -> bool {
        self.update(|c| c.with_assignees(ids))
    }

    pub fn set_accounts<S: Into<String>>(&mut self, ids: impl IntoIterator<Item = S>) -> bool {
        self.update(|c| c.with_accounts(ids))
    }

    pub fn set_categories<S: Into<String>>(&mut self, ids: impl IntoIterator<Item = S>) -> bool {
        self.update(|c| c.with_categories(ids))
    }

    pub fn set_tags<S: Into<String>>(&mut self, tags: impl IntoIterator<Item = S>) -> bool {
        self.update(|c| c.with_tags(tags))
    }

    pub fn set_due_range(&mut self, range: Option<DueDateRange>) -> bool {
        self.update(|c| c.with_due_range(range))
    }

    pub fn set_due_in(&mut self, due_in: Option<DueIn>) -> bool {
        self.update(|c| c.with_due_in(due_in))
    }

    pub fn set_progress_range(&mut self, range: ProgressRange) -> bool {
        self.update(|c| c.with_progress_range(range))
    }

    pub fn set_show_overdue(&mut self, show_overdue: bool) -> bool {
        self.update(|c| c.with_show_overdue(show_overdue))
    }

    pub fn set_show_completed(&mut self, show_completed: bool) -> bool {
        self.update(|c| c.with_show_completed(show_completed))
    }

    /// Reset every filter dimension. The sort selection is kept.
    pub fn clear(&mut self) -> bool {
        self.update(ViewConfig::cleared)
    }

    /// Sort by `key`, flipping direction if it is already active.
    pub fn toggle_sort(&mut self, key: SortKey) -> SortSpec {
        self.sort = self.sort.toggle(key);
        tracing::debug!("Sorting by {} ({:?})", self.sort.key, self.sort.direction);
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.config.clone()) {
            Some(previous) => {
                self.config = previous;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.config.clone()) {
            Some(next) => {
                self.config = next;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortDirection;
    use std::num::NonZeroU32;

    #[test]
    fn test_setter_touches_one_dimension() {
        let mut store = ViewConfigStore::new();
        store.set_search("globex");
        store.set_priorities([TaskPriority::High]);
        store.set_tags(["renewal"]);

        store.set_statuses([TaskStatus::Todo, TaskStatus::InProgress]);

        let config = store.config();
        assert_eq!(config.search, "globex");
        assert_eq!(config.priorities.len(), 1);
        assert!(config.tags.contains("renewal"));
        assert_eq!(config.statuses.len(), 2);
    }

    #[test]
    fn test_clear_resets_filters_keeps_sort() {
        let mut store = ViewConfigStore::new();
        store.toggle_sort(SortKey::Title);
        store.set_show_completed(false);
        store.set_show_overdue(true);
        store.set_due_in(Some(DueIn::weeks(NonZeroU32::new(1).unwrap())));
        store.set_progress_range(ProgressRange::new(50, 90));

        assert!(store.clear());
        assert_eq!(store.config(), &ViewConfig::default());
        assert!(store.config().show_completed);
        assert!(!store.config().show_overdue);
        assert_eq!(store.sort().key, SortKey::Title);
    }

    #[test]
    fn test_no_op_setter_records_no_history() {
        let mut store = ViewConfigStore::new();
        assert!(!store.set_show_completed(true));
        assert!(!store.can_undo());
    }

    #[test]
    fn test_undo_and_redo_selection() {
        let mut store = ViewConfigStore::new();
        store.set_search("acme");
        store.set_show_completed(false);

        assert!(store.undo());
        assert!(store.config().show_completed);
        assert_eq!(store.config().search, "acme");

        assert!(store.undo());
        assert_eq!(store.config(), &ViewConfig::default());
        assert!(!store.undo());

        assert!(store.redo());
        assert_eq!(store.config().search, "acme");
    }

    #[test]
    fn test_toggle_sort() {
        let mut store = ViewConfigStore::new();
        assert_eq!(store.sort(), SortSpec::default());

        let spec = store.toggle_sort(SortKey::DueDate);
        assert_eq!(spec.direction, SortDirection::Descending);

        let spec = store.toggle_sort(SortKey::Progress);
        assert_eq!(spec, SortSpec::new(SortKey::Progress, SortDirection::Ascending));
    }
}
