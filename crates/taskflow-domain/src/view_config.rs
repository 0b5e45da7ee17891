//! Filter selection for one task view.
//!
//! `ViewConfig` is an immutable value: every `with_*` transform consumes the
//! config and returns a new one, leaving all other dimensions untouched.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::task::{TaskPriority, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DueUnit {
    Days,
    Weeks,
    /// Approximated as 30 days.
    Months,
}

impl DueUnit {
    pub fn days_per_unit(self) -> i64 {
        match self {
            Self::Days => 1,
            Self::Weeks => 7,
            Self::Months => 30,
        }
    }
}

impl FromStr for DueUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d" | "day" | "days" => Ok(Self::Days),
            "w" | "week" | "weeks" => Ok(Self::Weeks),
            "m" | "month" | "months" => Ok(Self::Months),
            other => Err(format!("unknown due-in unit '{}'", other)),
        }
    }
}

/// Relative forward window from now, e.g. "due within 2 weeks".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DueIn {
    pub value: NonZeroU32,
    pub unit: DueUnit,
}

impl DueIn {
    pub fn new(value: NonZeroU32, unit: DueUnit) -> Self {
        Self { value, unit }
    }

    pub fn days(value: NonZeroU32) -> Self {
        Self::new(value, DueUnit::Days)
    }

    pub fn weeks(value: NonZeroU32) -> Self {
        Self::new(value, DueUnit::Weeks)
    }

    pub fn months(value: NonZeroU32) -> Self {
        Self::new(value, DueUnit::Months)
    }

    pub fn target_days(&self) -> i64 {
        i64::from(self.value.get()) * self.unit.days_per_unit()
    }
}

impl fmt::Display for DueIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            DueUnit::Days => "d",
            DueUnit::Weeks => "w",
            DueUnit::Months => "m",
        };
        write!(f, "{}{}", self.value, unit)
    }
}

impl FromStr for DueIn {
    type Err = String;

    /// Parses compact forms such as `3d`, `2w`, `1m` or `10 days`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("missing unit in '{}'", s))?;
        let (digits, unit) = trimmed.split_at(split);
        let value = digits
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| format!("due-in value must be a positive integer in '{}'", s))?;
        Ok(Self::new(value, unit.parse()?))
    }
}

/// Inclusive due-date bounds; `None` on either side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DueDateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DueDateRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| instant >= from) && self.to.map_or(true, |to| instant <= to)
    }
}

/// Inclusive progress bounds in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgressRange {
    pub min: u8,
    pub max: u8,
}

impl ProgressRange {
    pub fn new(min: u8, max: u8) -> Self {
        Self {
            min: min.min(100),
            max: max.min(100),
        }
    }

    pub fn is_full(&self) -> bool {
        self.min == 0 && self.max == 100
    }

    pub fn contains(&self, progress: u8) -> bool {
        self.min <= progress && progress <= self.max
    }
}

impl Default for ProgressRange {
    fn default() -> Self {
        Self { min: 0, max: 100 }
    }
}

/// Active filter selection. Empty sets mean "no restriction".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    pub search: String,
    pub statuses: BTreeSet<TaskStatus>,
    pub priorities: BTreeSet<TaskPriority>,
    pub assignees: BTreeSet<String>,
    pub account_ids: BTreeSet<String>,
    pub category_ids: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub due_range: Option<DueDateRange>,
    pub due_in: Option<DueIn>,
    pub progress: ProgressRange,
    /// Restrict to overdue tasks only.
    pub show_overdue: bool,
    pub show_completed: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            search: String::new(),
            statuses: BTreeSet::new(),
            priorities: BTreeSet::new(),
            assignees: BTreeSet::new(),
            account_ids: BTreeSet::new(),
            category_ids: BTreeSet::new(),
            tags: BTreeSet::new(),
            due_range: None,
            due_in: None,
            progress: ProgressRange::default(),
            show_overdue: false,
            show_completed: true,
        }
    }
}

impl ViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if any dimension restricts the result.
    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty()
            || !self.statuses.is_empty()
            || !self.priorities.is_empty()
            || !self.assignees.is_empty()
            || !self.account_ids.is_empty()
            || !self.category_ids.is_empty()
            || !self.tags.is_empty()
            || self.due_range.is_some_and(|r| !r.is_unbounded())
            || self.due_in.is_some()
            || !self.progress.is_full()
            || self.show_overdue
            || !self.show_completed
    }

    /// A config with every dimension back at its default.
    pub fn cleared(self) -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = TaskPriority>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    pub fn with_assignees<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.assignees = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_accounts<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.account_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.category_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_due_range(mut self, range: Option<DueDateRange>) -> Self {
        self.due_range = range;
        self
    }

    pub fn with_due_in(mut self, due_in: Option<DueIn>) -> Self {
        self.due_in = due_in;
        self
    }

    pub fn with_progress_range(mut self, range: ProgressRange) -> Self {
        self.progress = range;
        self
    }

    pub fn with_show_overdue(mut self, show_overdue: bool) -> Self {
        self.show_overdue = show_overdue;
        self
    }

    pub fn with_show_completed(mut self, show_completed: bool) -> Self {
        self.show_completed = show_completed;
        self
    }
}
