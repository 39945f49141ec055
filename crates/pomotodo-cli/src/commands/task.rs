//! Task list commands for CLI.

use clap::Subcommand;
use pomotodo_core::{Config, DropTarget, ListName, ReorderTarget, Result, TaskError, TaskId};
use serde_json::json;

use super::{open_app, print_json, CliApp};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the end of a list (backlog or active)
    Add {
        /// List name: backlog|today, active|current|now
        list: String,
        /// Task text
        content: String,
    },
    /// Print all three lists, or one of them
    List {
        /// Only this list
        list: Option<String>,
    },
    /// Delete a task from a list
    Delete { list: String, id: String },
    /// Remove every task from a list
    Clear { list: String },
    /// Toggle completion; backlog and completed tasks swap lists
    Toggle { list: String, id: String },
    /// Move a task between backlog and active; LIST is the destination
    Move { list: String, id: String },
    /// Reposition a task inside its list
    Reorder {
        list: String,
        id: String,
        /// Place before this task (default: end of list)
        #[arg(long)]
        before: Option<String>,
    },
    /// Drop a task onto another task or a list; no target cancels the drag
    Drag {
        id: String,
        /// Task id or list name
        target: Option<String>,
    },
}

fn list_arg(raw: &str) -> Result<ListName, TaskError> {
    raw.parse()
}

fn id_arg(raw: &str) -> Result<TaskId, TaskError> {
    raw.parse()
}

fn print_lists(app: &CliApp, changed: bool) -> Result<()> {
    print_json(&json!({
        "changed": changed,
        "lists": app.task_lists(),
    }))
}

pub fn run(action: TaskAction, config: &Config) -> Result<()> {
    let app = open_app(config)?;

    match action {
        TaskAction::Add { list, content } => {
            let id = app.add_task(list_arg(&list)?, &content)?;
            let task = app.tasks().get(id).cloned();
            print_json(&task)?;
        }
        TaskAction::List { list } => match list {
            Some(list) => print_json(app.tasks().list(list_arg(&list)?))?,
            None => print_json(&app.task_lists())?,
        },
        TaskAction::Delete { list, id } => {
            let changed = app.delete_task(list_arg(&list)?, id_arg(&id)?);
            print_lists(&app, changed)?;
        }
        TaskAction::Clear { list } => {
            let removed = app.clear_list(list_arg(&list)?);
            print_lists(&app, removed > 0)?;
        }
        TaskAction::Toggle { list, id } => {
            let changed = app.toggle_task(list_arg(&list)?, id_arg(&id)?);
            print_lists(&app, changed)?;
        }
        TaskAction::Move { list, id } => {
            let changed = app.move_task(list_arg(&list)?, id_arg(&id)?)?;
            print_lists(&app, changed)?;
        }
        TaskAction::Reorder { list, id, before } => {
            let target = match before {
                Some(before) => ReorderTarget::Before(id_arg(&before)?),
                None => ReorderTarget::End,
            };
            let changed = app.reorder_task(list_arg(&list)?, id_arg(&id)?, target);
            print_lists(&app, changed)?;
        }
        TaskAction::Drag { id, target } => {
            let target = target
                .map(|raw| DropTarget::parse(&raw).ok_or(TaskError::InvalidId(raw)))
                .transpose()?;
            let resolution = app.drag(id_arg(&id)?, target);
            print_json(&json!({
                "resolution": resolution,
                "lists": app.task_lists(),
            }))?;
        }
    }
    Ok(())
}
