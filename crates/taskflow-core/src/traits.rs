//! Collaborators the board engine reads from but does not own.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Source of "now" for time-window predicates.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Read-only id -> display name lookup (accounts, categories, users).
pub trait LabelDirectory: Send + Sync {
    fn name_of(&self, id: &str) -> Option<&str>;
}

/// Directory that knows no names.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyDirectory;

impl LabelDirectory for EmptyDirectory {
    fn name_of(&self, _id: &str) -> Option<&str> {
        None
    }
}

impl LabelDirectory for HashMap<String, String> {
    fn name_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Task,
    Account,
    Contact,
    Project,
}

/// Answers whether the current actor may mutate a kind of resource.
pub trait Authorizer: Send + Sync {
    fn can_update(&self, kind: ResourceKind) -> bool;
}

/// Grants every mutation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn can_update(&self, _kind: ResourceKind) -> bool {
        true
    }
}

/// Grants nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnly;

impl Authorizer for ReadOnly {
    fn can_update(&self, _kind: ResourceKind) -> bool {
        false
    }
}
