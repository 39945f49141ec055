//! Task types and the three ordered task lists.
//!
//! A task lives in exactly one of three lists at any time:
//!
//! ```text
//!   BACKLOG ──move──> ACTIVE ──(break ends, if checked)──> COMPLETED
//!      ^  <──move───     |                                    |
//!      |                 +── toggle flips the flag in place   |
//!      +──────────────────────── toggle ──────────────────────+
//! ```
//!
//! Toggling a backlog task sends it straight to `completed`; dragging can
//! relocate a task between any two lists.

pub mod drag;
pub mod store;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::TaskError;

pub use drag::{resolve_drop, DropTarget, NoOpReason, Resolution, TransferInstruction};
pub use store::{ReorderTarget, TaskListStore, TaskLists};

/// Opaque, collision-free task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        TaskId(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TaskId {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(TaskId)
            .map_err(|_| TaskError::InvalidId(s.to_string()))
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub content: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create an unchecked task with a fresh id.
    pub fn new(content: impl Into<String>) -> Self {
        Task {
            id: TaskId::new(),
            content: content.into(),
            completed: false,
        }
    }
}

/// One of the three named task lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListName {
    /// Not yet started ("today").
    Backlog,
    /// Being worked on during the current focus phase ("now").
    Active,
    /// Done.
    Completed,
}

impl ListName {
    pub const ALL: [ListName; 3] = [ListName::Backlog, ListName::Active, ListName::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListName::Backlog => "backlog",
            ListName::Active => "active",
            ListName::Completed => "completed",
        }
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListName {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backlog" | "today" => Ok(ListName::Backlog),
            "active" | "current" | "now" => Ok(ListName::Active),
            "completed" | "done" => Ok(ListName::Completed),
            _ => Err(TaskError::UnknownList(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_name_accepts_aliases() {
        assert_eq!("today".parse::<ListName>().unwrap(), ListName::Backlog);
        assert_eq!("Current".parse::<ListName>().unwrap(), ListName::Active);
        assert_eq!("done".parse::<ListName>().unwrap(), ListName::Completed);
        assert!("someday".parse::<ListName>().is_err());
    }

    #[test]
    fn task_ids_are_unique_and_parse_back() {
        let a = Task::new("a");
        let b = Task::new("b");
        assert_ne!(a.id, b.id);
        let parsed: TaskId = a.id.to_string().parse().unwrap();
        assert_eq!(parsed, a.id);
        assert!("1700000000".parse::<TaskId>().is_err());
    }

    #[test]
    fn new_task_is_unchecked() {
        let task = Task::new("write report");
        assert!(!task.completed);
        assert_eq!(task.content, "write report");
    }
}
