//! Composition root.
//!
//! [`PomodoroApp`] owns one session engine and one task list store, restores
//! both from storage, and keeps storage current by listening to their
//! events. Hosts (the CLI, a GUI shell) talk to this type only.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use crate::bridge::SessionTaskBridge;
use crate::clock::Clock;
use crate::error::{TaskError, ValidationError};
use crate::events::{Event, ListenerId};
use crate::notify::{self, NotificationPort};
use crate::storage::{Config, Snapshots, StoragePort};
use crate::task::{
    resolve_drop, DropTarget, ListName, ReorderTarget, Resolution, TaskId, TaskListStore, TaskLists,
};
use crate::timer::{PollHandle, SessionConfig, SessionEngine, SessionState, Setting, SettingEdit};

/// Startup options that come from the user's config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppOptions {
    /// Settings used when storage holds none.
    pub session_defaults: SessionConfig,
    pub notifications_enabled: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            session_defaults: SessionConfig::default(),
            notifications_enabled: true,
        }
    }
}

impl AppOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            session_defaults: config.session_defaults(),
            notifications_enabled: config.notifications.enabled,
        }
    }
}

pub struct PomodoroApp<C: Clock, S: StoragePort + 'static, N: NotificationPort + 'static> {
    engine: SessionEngine<C>,
    tasks: Rc<RefCell<TaskListStore>>,
    storage: Rc<S>,
    notifier: Rc<N>,
    notifications_enabled: Rc<Cell<bool>>,
}

impl<C: Clock, S: StoragePort + 'static, N: NotificationPort + 'static> PomodoroApp<C, S, N> {
    /// Restore from `storage` and wire persistence, notifications and the
    /// break-end task sweep. The session always comes back paused.
    pub fn new(clock: C, storage: S, notifier: N, options: AppOptions) -> Self {
        let storage = Rc::new(storage);
        let notifier = Rc::new(notifier);
        let snapshots = Snapshots::new(Rc::clone(&storage));

        let config = snapshots.load_session_config(options.session_defaults);
        let state = snapshots.load_session_state(&config);
        let tasks = Rc::new(RefCell::new(TaskListStore::from_lists(
            snapshots.load_task_lists(),
        )));
        let mut engine = SessionEngine::restore(config, state, clock);

        SessionTaskBridge::connect(&mut engine, Rc::clone(&tasks));

        engine.subscribe(move |event| {
            let result = match event {
                Event::StateSnapshot { state, .. } => snapshots.save_session_state(state),
                Event::SettingsChanged { config, .. } => snapshots.save_session_config(config),
                _ => return,
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, "failed to persist session");
            }
        });

        let task_snapshots = Snapshots::new(Rc::clone(&storage));
        tasks.borrow_mut().subscribe(move |event| {
            if let Event::TaskListsChanged {
                backlog,
                active,
                completed,
            } = event
            {
                let lists = TaskLists {
                    backlog: backlog.clone(),
                    active: active.clone(),
                    completed: completed.clone(),
                };
                if let Err(e) = task_snapshots.save_task_lists(&lists) {
                    tracing::warn!(error = %e, "failed to persist task lists");
                }
            }
        });

        let notifications_enabled = Rc::new(Cell::new(options.notifications_enabled));
        let enabled = Rc::clone(&notifications_enabled);
        let sink = Rc::clone(&notifier);
        engine.subscribe(move |event| {
            if enabled.get() {
                notify::deliver(&*sink, event);
            }
        });

        Self {
            engine,
            tasks,
            storage,
            notifier,
            notifications_enabled,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        self.engine.state()
    }

    pub fn config(&self) -> &SessionConfig {
        self.engine.config()
    }

    pub fn engine(&self) -> &SessionEngine<C> {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn active_poll(&self) -> Option<PollHandle> {
        self.engine.active_poll()
    }

    pub fn tasks(&self) -> Ref<'_, TaskListStore> {
        self.tasks.borrow()
    }

    pub fn task_lists(&self) -> TaskLists {
        self.tasks.borrow().snapshot()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled.get()
    }

    pub fn set_notifications_enabled(&self, enabled: bool) {
        self.notifications_enabled.set(enabled);
    }

    /// Observe session events (after persistence and the task sweep).
    pub fn subscribe_session(&mut self, listener: impl FnMut(&Event) + 'static) -> ListenerId {
        self.engine.subscribe(listener)
    }

    /// Observe task list snapshots.
    pub fn subscribe_tasks(&mut self, listener: impl FnMut(&Event) + 'static) -> ListenerId {
        self.tasks.borrow_mut().subscribe(listener)
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn toggle_run(&mut self) -> Vec<Event> {
        self.engine.toggle_run()
    }

    pub fn reset_current_phase(&mut self) -> Vec<Event> {
        self.engine.reset_current_phase()
    }

    pub fn reset_session(&mut self) -> Vec<Event> {
        self.engine.reset_session()
    }

    pub fn poll(&mut self, handle: PollHandle) -> Vec<Event> {
        self.engine.poll(handle)
    }

    pub fn tick(&mut self) -> Vec<Event> {
        self.engine.tick()
    }

    pub fn update_setting(&mut self, setting: Setting, raw: &str) -> Result<Vec<Event>, ValidationError> {
        self.engine.update_setting(setting, raw)
    }

    pub fn apply_setting(&mut self, edit: SettingEdit) -> Vec<Event> {
        self.engine.apply_setting(edit)
    }

    pub fn teardown(&mut self) -> Vec<Event> {
        self.engine.teardown()
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&self, list: ListName, content: &str) -> Result<TaskId, TaskError> {
        self.tasks.borrow_mut().add(list, content)
    }

    pub fn delete_task(&self, list: ListName, id: TaskId) -> bool {
        self.tasks.borrow_mut().delete(list, id)
    }

    pub fn clear_list(&self, list: ListName) -> usize {
        self.tasks.borrow_mut().clear(list)
    }

    pub fn reorder_task(&self, list: ListName, id: TaskId, target: ReorderTarget) -> bool {
        self.tasks.borrow_mut().reorder(list, id, target)
    }

    pub fn toggle_task(&self, list: ListName, id: TaskId) -> bool {
        self.tasks.borrow_mut().toggle(list, id)
    }

    pub fn move_task(&self, into: ListName, id: TaskId) -> Result<bool, TaskError> {
        self.tasks.borrow_mut().move_to(into, id)
    }

    /// Resolve a finished drag and apply it.
    pub fn drag(&self, source: TaskId, target: Option<DropTarget>) -> Resolution {
        let resolution = resolve_drop(source, target, self.tasks.borrow().lists());
        if let Resolution::Transfer(instruction) = &resolution {
            self.tasks.borrow_mut().apply_transfer(instruction);
        }
        resolution
    }
}

impl<C: Clock, S: StoragePort + 'static, N: NotificationPort + 'static> Drop for PomodoroApp<C, S, N> {
    fn drop(&mut self) {
        self.engine.teardown();
    }
}
