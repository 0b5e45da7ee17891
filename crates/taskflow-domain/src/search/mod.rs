//! Free-text search over tasks.
//!
//! A query matches when its lowercase form is a substring of the lowercased
//! title, description, or account name. An empty query matches everything.

use taskflow_core::LabelDirectory;

use crate::Task;

/// Trait for searching tasks by a text field.
pub trait TaskSearcher {
    /// Returns true if the task matches the search criteria.
    fn matches(&self, task: &Task, accounts: &dyn LabelDirectory) -> bool;
}

fn contains_query(haystack: &str, query: &str) -> bool {
    query.is_empty() || haystack.to_lowercase().contains(query)
}

/// Search tasks by title (case-insensitive).
pub struct TitleSearcher {
    query: String,
}

impl TitleSearcher {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into().to_lowercase(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl TaskSearcher for TitleSearcher {
    fn matches(&self, task: &Task, _accounts: &dyn LabelDirectory) -> bool {
        contains_query(&task.title, &self.query)
    }
}

/// Search tasks by description (case-insensitive).
pub struct DescriptionSearcher {
    query: String,
}

impl DescriptionSearcher {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into().to_lowercase(),
        }
    }
}

impl TaskSearcher for DescriptionSearcher {
    fn matches(&self, task: &Task, _accounts: &dyn LabelDirectory) -> bool {
        contains_query(&task.description, &self.query)
    }
}

/// Search tasks by the name of their account.
///
/// Uses the name carried on the task, falling back to the account directory.
/// Tasks without a resolvable account name do not match a non-empty query.
pub struct AccountNameSearcher {
    query: String,
}

impl AccountNameSearcher {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into().to_lowercase(),
        }
    }
}

impl TaskSearcher for AccountNameSearcher {
    fn matches(&self, task: &Task, accounts: &dyn LabelDirectory) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let name = task.account_name.as_deref().or_else(|| {
            task.account_id
                .as_deref()
                .and_then(|id| accounts.name_of(id))
        });
        name.is_some_and(|name| contains_query(name, &self.query))
    }
}

/// Enum dispatch for searching tasks by a specific field.
pub enum SearchBy {
    Title(TitleSearcher),
    Description(DescriptionSearcher),
    AccountName(AccountNameSearcher),
}

impl SearchBy {
    fn matches(&self, task: &Task, accounts: &dyn LabelDirectory) -> bool {
        match self {
            Self::Title(s) => s.matches(task, accounts),
            Self::Description(s) => s.matches(task, accounts),
            Self::AccountName(s) => s.matches(task, accounts),
        }
    }
}

/// Composite searcher that matches if any sub-searcher matches.
pub struct CompositeSearcher {
    searchers: Vec<SearchBy>,
}

impl CompositeSearcher {
    /// Create an empty composite searcher (matches all tasks).
    pub fn new() -> Self {
        Self {
            searchers: Vec::new(),
        }
    }

    /// Title, description and account name.
    pub fn all(query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            searchers: vec![
                SearchBy::Title(TitleSearcher::new(query.clone())),
                SearchBy::Description(DescriptionSearcher::new(query.clone())),
                SearchBy::AccountName(AccountNameSearcher::new(query)),
            ],
        }
    }

    pub fn with_search(mut self, searcher: SearchBy) -> Self {
        self.searchers.push(searcher);
        self
    }
}

impl Default for CompositeSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskSearcher for CompositeSearcher {
    fn matches(&self, task: &Task, accounts: &dyn LabelDirectory) -> bool {
        if self.searchers.is_empty() {
            return true;
        }
        self.searchers
            .iter()
            .any(|searcher| searcher.matches(task, accounts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskStatus;
    use std::collections::HashMap;
    use taskflow_core::EmptyDirectory;

    fn task(title: &str, description: &str) -> Task {
        let mut task = Task::new(title, TaskStatus::Todo);
        task.description = description.to_string();
        task
    }

    #[test]
    fn test_title_searcher_case_insensitive() {
        let t = task("Quarterly Business Review", "");
        assert!(TitleSearcher::new("business").matches(&t, &EmptyDirectory));
        assert!(TitleSearcher::new("QBR").matches(&task("qbr prep", ""), &EmptyDirectory));
        assert!(!TitleSearcher::new("renewal").matches(&t, &EmptyDirectory));
    }

    #[test]
    fn test_empty_query_matches() {
        let t = task("Anything", "");
        assert!(TitleSearcher::new("").matches(&t, &EmptyDirectory));
        assert!(CompositeSearcher::all("").matches(&t, &EmptyDirectory));
        assert!(CompositeSearcher::new().matches(&t, &EmptyDirectory));
    }

    #[test]
    fn test_description_match() {
        let t = task("Follow up", "Send the Renewal quote");
        assert!(CompositeSearcher::all("renewal").matches(&t, &EmptyDirectory));
    }

    #[test]
    fn test_account_name_from_task_or_directory() {
        let mut with_name = task("Call", "");
        with_name.account_name = Some("Initech".to_string());
        assert!(AccountNameSearcher::new("inite").matches(&with_name, &EmptyDirectory));

        let mut with_id = task("Call", "");
        with_id.account_id = Some("acc-7".to_string());
        let mut accounts = HashMap::new();
        accounts.insert("acc-7".to_string(), "Umbrella Corp".to_string());
        assert!(AccountNameSearcher::new("umbrella").matches(&with_id, &accounts));
        assert!(!AccountNameSearcher::new("umbrella").matches(&with_id, &EmptyDirectory));
    }
}
