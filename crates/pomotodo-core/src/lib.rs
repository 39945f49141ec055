//! # Pomotodo Core Library
//!
//! This library provides the core logic for Pomotodo, a Pomodoro timer paired
//! with three ordered task lists. All behavior lives here; the `pomotodo`
//! CLI and any GUI shell are thin hosts over the same types.
//!
//! ## Architecture
//!
//! - **Session engine**: a pure state machine over (phase, running) with a
//!   drift-free, wall-clock countdown. The host polls it; it never spawns
//!   threads of its own.
//! - **Task lists**: backlog, active and completed, with toggle, move and
//!   drag-and-drop transfer rules.
//! - **Bridge**: when a break ends, checked active tasks move to completed.
//! - **Storage**: SQLite key-value records for lists, settings and session
//!   state, plus TOML-based configuration.
//!
//! ## Key Components
//!
//! - [`PomodoroApp`]: composition root used by hosts
//! - [`SessionEngine`]: timer driver over [`transition`]
//! - [`TaskListStore`]: the three lists and their mutations
//! - [`resolve_drop`]: drag gesture to list transfer
//! - [`Config`]: application configuration management

pub mod app;
pub mod bridge;
pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod task;
pub mod timer;

pub use app::{AppOptions, PomodoroApp};
pub use bridge::SessionTaskBridge;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, NotifyError, Result, StorageError, TaskError, ValidationError};
pub use events::{Event, ListenerId};
pub use notify::{NotificationPort, NullNotifier};
pub use storage::{Config, MemoryStorage, SqliteStorage, StoragePort};
pub use task::{
    resolve_drop, DropTarget, ListName, NoOpReason, ReorderTarget, Resolution, Task, TaskId,
    TaskListStore, TaskLists, TransferInstruction,
};
pub use timer::{
    format_clock, transition, Phase, PollHandle, SessionConfig, SessionEngine, SessionInput,
    SessionState, Setting, SettingEdit,
};
