//! Drag-and-drop resolution.
//!
//! The host's gesture layer reports only where a drag started (a task id)
//! and where it ended (another task, a whole-list drop zone, or nowhere).
//! [`resolve_drop`] turns that into a [`TransferInstruction`] against the
//! current lists without touching them; the caller applies it with
//! [`TaskListStore::apply_transfer`](super::TaskListStore::apply_transfer).

use serde::{Deserialize, Serialize};

use super::{ListName, TaskId, TaskLists};

/// Where a drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum DropTarget {
    /// Dropped onto another task.
    Task(TaskId),
    /// Dropped onto a list's empty zone.
    List(ListName),
}

impl DropTarget {
    /// Interpret free text as a drop target: a list name if it is one,
    /// otherwise a task id. Returns `None` if it is neither.
    pub fn parse(text: &str) -> Option<Self> {
        if let Ok(list) = text.parse::<ListName>() {
            return Some(DropTarget::List(list));
        }
        text.parse::<TaskId>().ok().map(DropTarget::Task)
    }
}

/// A fully resolved list mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInstruction {
    pub task_id: TaskId,
    pub source_list: ListName,
    pub target_list: ListName,
    /// Index in the target list, measured before the task is removed
    /// from its source.
    pub insertion_index: usize,
    /// Completion flag forced on cross-list moves; `None` for reorders.
    pub forced_completed: Option<bool>,
}

impl TransferInstruction {
    pub fn is_reorder(&self) -> bool {
        self.source_list == self.target_list
    }
}

/// Why a drop resolved to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    /// The drag ended outside any drop target.
    Cancelled,
    /// The dragged task is in none of the lists.
    SourceNotFound,
    /// The target task is in none of the lists.
    TargetNotFound,
    /// Dropped onto itself.
    SameTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    NoOp { reason: NoOpReason },
    Transfer(TransferInstruction),
}

impl Resolution {
    pub fn instruction(&self) -> Option<&TransferInstruction> {
        match self {
            Resolution::Transfer(instruction) => Some(instruction),
            Resolution::NoOp { .. } => None,
        }
    }
}

/// Resolve a finished drag gesture against the current lists.
pub fn resolve_drop(source: TaskId, target: Option<DropTarget>, lists: &TaskLists) -> Resolution {
    let no_op = |reason| {
        tracing::debug!(task_id = %source, ?reason, "drop resolved to no-op");
        Resolution::NoOp { reason }
    };

    let Some(target) = target else {
        return no_op(NoOpReason::Cancelled);
    };
    let Some((source_list, _)) = lists.position(source) else {
        return no_op(NoOpReason::SourceNotFound);
    };

    let (target_list, insertion_index) = match target {
        DropTarget::Task(over) if over == source => return no_op(NoOpReason::SameTask),
        DropTarget::Task(over) => match lists.position(over) {
            Some(found) => found,
            None => return no_op(NoOpReason::TargetNotFound),
        },
        DropTarget::List(list) => (list, lists.get(list).len()),
    };

    let forced_completed = if source_list == target_list {
        None
    } else {
        Some(target_list == ListName::Completed)
    };

    Resolution::Transfer(TransferInstruction {
        task_id: source,
        source_list,
        target_list,
        insertion_index,
        forced_completed,
    })
}
