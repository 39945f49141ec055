pub mod config;
pub mod settings;
pub mod task;
pub mod timer;

use pomotodo_core::{AppOptions, Config, PomodoroApp, Result, SqliteStorage, SystemClock};
use serde::Serialize;

use crate::notifier::TerminalNotifier;

pub type CliApp = PomodoroApp<SystemClock, SqliteStorage, TerminalNotifier>;

/// Open the app against the on-disk database, restoring lists and session.
pub fn open_app(config: &Config) -> Result<CliApp> {
    let storage = SqliteStorage::open()?;
    Ok(PomodoroApp::new(
        SystemClock,
        storage,
        TerminalNotifier,
        AppOptions::from_config(config),
    ))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
