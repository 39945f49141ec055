//! Owner of the three task lists.
//!
//! Every mutation preserves the one-owner invariant: a task id appears in at
//! most one list, and no operation other than delete/clear changes the total
//! number of tasks. Mutations that change anything notify subscribers with
//! [`Event::TaskListsChanged`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::drag::TransferInstruction;
use super::{ListName, Task, TaskId};
use crate::error::TaskError;
use crate::events::{Event, ListenerId, Listeners};

/// Snapshot of all three lists. Also the persisted record shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLists {
    #[serde(default)]
    pub backlog: Vec<Task>,
    #[serde(default)]
    pub active: Vec<Task>,
    #[serde(default)]
    pub completed: Vec<Task>,
}

impl TaskLists {
    pub fn get(&self, list: ListName) -> &[Task] {
        match list {
            ListName::Backlog => &self.backlog,
            ListName::Active => &self.active,
            ListName::Completed => &self.completed,
        }
    }

    fn get_mut(&mut self, list: ListName) -> &mut Vec<Task> {
        match list {
            ListName::Backlog => &mut self.backlog,
            ListName::Active => &mut self.active,
            ListName::Completed => &mut self.completed,
        }
    }

    pub fn total_len(&self) -> usize {
        self.backlog.len() + self.active.len() + self.completed.len()
    }

    /// Drop every repeated id after its first occurrence, scanning
    /// backlog, active, completed in that order. Returns how many were dropped.
    pub fn dedupe(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut dropped = 0;
        for list in ListName::ALL {
            let tasks = self.get_mut(list);
            let before = tasks.len();
            tasks.retain(|task| seen.insert(task.id));
            dropped += before - tasks.len();
        }
        dropped
    }

    /// Which list holds `id`, and at what index.
    pub fn position(&self, id: TaskId) -> Option<(ListName, usize)> {
        ListName::ALL.into_iter().find_map(|list| {
            self.get(list)
                .iter()
                .position(|task| task.id == id)
                .map(|index| (list, index))
        })
    }
}

/// Where [`TaskListStore::reorder`] should place a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderTarget {
    /// Directly in front of another task of the same list.
    Before(TaskId),
    End,
}

#[derive(Debug, Default)]
pub struct TaskListStore {
    lists: TaskLists,
    listeners: Listeners,
}

impl TaskListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted snapshot, repairing duplicates.
    pub fn from_lists(mut lists: TaskLists) -> Self {
        let dropped = lists.dedupe();
        if dropped > 0 {
            tracing::warn!(dropped, "task list snapshot held duplicate ids; kept first occurrences");
        }
        Self {
            lists,
            listeners: Listeners::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn list(&self, list: ListName) -> &[Task] {
        self.lists.get(list)
    }

    pub fn lists(&self) -> &TaskLists {
        &self.lists
    }

    pub fn snapshot(&self) -> TaskLists {
        self.lists.clone()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        let (list, index) = self.locate(id)?;
        self.lists.get(list).get(index)
    }

    /// Which list holds `id`, and at what index.
    pub fn locate(&self, id: TaskId) -> Option<(ListName, usize)> {
        self.lists.position(id)
    }

    pub fn total_len(&self) -> usize {
        self.lists.total_len()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a new unchecked task to `backlog` or `active`.
    pub fn add(&mut self, list: ListName, content: &str) -> Result<TaskId, TaskError> {
        if list == ListName::Completed {
            return Err(TaskError::UnsupportedList {
                operation: "add",
                list: list.to_string(),
            });
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(TaskError::EmptyContent);
        }
        let task = Task::new(content);
        let id = task.id;
        self.lists.get_mut(list).push(task);
        self.changed();
        Ok(id)
    }

    /// Remove a task from the named list. Returns `false` if it was not there.
    pub fn delete(&mut self, list: ListName, id: TaskId) -> bool {
        let tasks = self.lists.get_mut(list);
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        let removed = tasks.len() != before;
        if removed {
            self.changed();
        }
        removed
    }

    /// Empty the named list. Returns how many tasks were removed.
    pub fn clear(&mut self, list: ListName) -> usize {
        let removed = std::mem::take(self.lists.get_mut(list)).len();
        if removed > 0 {
            self.changed();
        }
        removed
    }

    /// Move a task to a new position inside its own list.
    pub fn reorder(&mut self, list: ListName, id: TaskId, target: ReorderTarget) -> bool {
        if target == ReorderTarget::Before(id) {
            return false;
        }
        let tasks = self.lists.get_mut(list);
        let Some(from) = tasks.iter().position(|task| task.id == id) else {
            return false;
        };
        if let ReorderTarget::Before(before) = target {
            if !tasks.iter().any(|task| task.id == before) {
                return false;
            }
        }

        let task = tasks.remove(from);
        let to = match target {
            ReorderTarget::Before(before) => tasks
                .iter()
                .position(|task| task.id == before)
                .unwrap_or(tasks.len()),
            ReorderTarget::End => tasks.len(),
        };
        tasks.insert(to, task);

        let moved = to != from;
        if moved {
            self.changed();
        }
        moved
    }

    /// Toggle a task's completion; what that means depends on the list.
    ///
    /// - `backlog`: moves to the end of `completed`, checked.
    /// - `active`: flips the flag in place.
    /// - `completed`: moves back to the end of `backlog`, unchecked.
    pub fn toggle(&mut self, list: ListName, id: TaskId) -> bool {
        let Some(index) = self.lists.get(list).iter().position(|task| task.id == id) else {
            return false;
        };
        match list {
            ListName::Backlog => {
                let mut task = self.lists.backlog.remove(index);
                task.completed = true;
                self.lists.completed.push(task);
            }
            ListName::Active => {
                let task = &mut self.lists.active[index];
                task.completed = !task.completed;
            }
            ListName::Completed => {
                let mut task = self.lists.completed.remove(index);
                task.completed = false;
                self.lists.backlog.push(task);
            }
        }
        self.changed();
        true
    }

    /// Promote a backlog task into `active`, or demote an active task into
    /// `backlog`. `into` names the destination.
    ///
    /// Moving into `active` keeps the flag; moving into `backlog` clears it.
    pub fn move_to(&mut self, into: ListName, id: TaskId) -> Result<bool, TaskError> {
        let from = match into {
            ListName::Active => ListName::Backlog,
            ListName::Backlog => ListName::Active,
            ListName::Completed => {
                return Err(TaskError::UnsupportedList {
                    operation: "move",
                    list: into.to_string(),
                })
            }
        };
        let source = self.lists.get_mut(from);
        let Some(index) = source.iter().position(|task| task.id == id) else {
            return Ok(false);
        };
        let mut task = source.remove(index);
        if into == ListName::Backlog {
            task.completed = false;
        }
        self.lists.get_mut(into).push(task);
        self.changed();
        Ok(true)
    }

    /// Move every checked task of `active` to the end of `completed`,
    /// keeping relative order on both sides. Returns how many moved.
    pub fn sweep_active_completed(&mut self) -> usize {
        let (done, remaining): (Vec<Task>, Vec<Task>) = std::mem::take(&mut self.lists.active)
            .into_iter()
            .partition(|task| task.completed);
        self.lists.active = remaining;
        let moved = done.len();
        self.lists.completed.extend(done);
        if moved > 0 {
            self.changed();
        }
        moved
    }

    /// Apply a resolved drag instruction in one step.
    ///
    /// Returns `false` when the instruction no longer matches the lists
    /// (the task moved or vanished since it was resolved).
    pub fn apply_transfer(&mut self, instruction: &TransferInstruction) -> bool {
        match self.locate(instruction.task_id) {
            Some((list, _)) if list == instruction.source_list => {}
            _ => {
                tracing::debug!(task_id = %instruction.task_id, "stale drag instruction ignored");
                return false;
            }
        }

        let source = self.lists.get_mut(instruction.source_list);
        let Some(from) = source.iter().position(|task| task.id == instruction.task_id) else {
            return false;
        };
        let mut task = source.remove(from);
        if let Some(flag) = instruction.forced_completed {
            task.completed = flag;
        }

        let target = self.lists.get_mut(instruction.target_list);
        let to = instruction.insertion_index.min(target.len());
        target.insert(to, task);

        if instruction.source_list == instruction.target_list && to == from {
            return false;
        }
        self.changed();
        true
    }

    fn changed(&mut self) {
        let event = Event::TaskListsChanged {
            backlog: self.lists.backlog.clone(),
            active: self.lists.active.clone(),
            completed: self.lists.completed.clone(),
        };
        self.listeners.emit(&event);
    }
}
