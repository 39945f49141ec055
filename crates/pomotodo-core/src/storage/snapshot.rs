//! Typed access to the three persisted records.
//!
//! Reads never fail: a missing, unreadable or invalid record falls back to
//! defaults. Writes report errors but the caller's in-memory state stays
//! authoritative either way.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::StoragePort;
use crate::error::StorageError;
use crate::task::TaskLists;
use crate::timer::{SessionConfig, SessionState};

pub const TASK_LISTS_KEY: &str = "task_lists";
pub const SESSION_CONFIG_KEY: &str = "session_config";
pub const SESSION_STATE_KEY: &str = "session_state";

pub struct Snapshots<S: StoragePort> {
    storage: S,
}

impl<S: StoragePort> Snapshots<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load_task_lists(&self) -> TaskLists {
        self.load_record(TASK_LISTS_KEY).unwrap_or_default()
    }

    /// Stored settings if present and valid, `fallback` otherwise.
    pub fn load_session_config(&self, fallback: SessionConfig) -> SessionConfig {
        match self.load_record::<SessionConfig>(SESSION_CONFIG_KEY) {
            Some(config) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    tracing::warn!(error = %e, "stored session config invalid; using defaults");
                    fallback
                }
            },
            None => fallback,
        }
    }

    /// Stored session state normalized against `config`, with `running`
    /// forced off; a fresh session if nothing usable is stored.
    pub fn load_session_state(&self, config: &SessionConfig) -> SessionState {
        self.load_record::<SessionState>(SESSION_STATE_KEY)
            .map(|state| state.restored(config))
            .unwrap_or_else(|| SessionState::initial(config))
    }

    pub fn save_task_lists(&self, lists: &TaskLists) -> Result<(), StorageError> {
        self.save_record(TASK_LISTS_KEY, lists)
    }

    pub fn save_session_config(&self, config: &SessionConfig) -> Result<(), StorageError> {
        self.save_record(SESSION_CONFIG_KEY, config)
    }

    pub fn save_session_state(&self, state: &SessionState) -> Result<(), StorageError> {
        self.save_record(SESSION_STATE_KEY, state)
    }

    fn load_record<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = match self.storage.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored record; using defaults");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored record has unexpected shape; using defaults");
                None
            }
        }
    }

    fn save_record<T: Serialize>(&self, key: &str, record: &T) -> Result<(), StorageError> {
        let value = serde_json::to_value(record)?;
        self.storage.save(key, &value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::task::Task;
    use crate::timer::Phase;
    use serde_json::json;

    #[test]
    fn missing_records_fall_back_to_defaults() {
        let snapshots = Snapshots::new(MemoryStorage::new());
        let config = snapshots.load_session_config(SessionConfig::default());
        assert_eq!(config, SessionConfig::default());
        assert_eq!(snapshots.load_task_lists(), TaskLists::default());
        assert_eq!(
            snapshots.load_session_state(&config),
            SessionState::initial(&config)
        );
    }

    #[test]
    fn corrupt_records_fall_back_to_defaults() {
        let storage = MemoryStorage::new();
        storage.insert(TASK_LISTS_KEY, json!("garbage"));
        storage.insert(
            SESSION_CONFIG_KEY,
            json!({"work_duration": 0, "break_duration": 5, "target_pomodoro_count": 1}),
        );
        storage.insert(SESSION_STATE_KEY, json!({"phase": "lunch"}));
        let snapshots = Snapshots::new(storage);
        let config = snapshots.load_session_config(SessionConfig::default());
        assert_eq!(config, SessionConfig::default());
        assert!(snapshots.load_task_lists().backlog.is_empty());
        assert_eq!(snapshots.load_session_state(&config).phase, Phase::Work);
    }

    #[test]
    fn stored_state_comes_back_paused() {
        let snapshots = Snapshots::new(MemoryStorage::new());
        let config = SessionConfig::new(60, 30, 2, true).unwrap();
        let state = SessionState {
            phase: Phase::Break,
            remaining_secs: 12.5,
            phase_duration: 30,
            running: true,
            completed_pomodoro_count: 1,
        };
        snapshots.save_session_config(&config).unwrap();
        snapshots.save_session_state(&state).unwrap();

        let loaded_config = snapshots.load_session_config(SessionConfig::default());
        assert_eq!(loaded_config, config);
        let loaded = snapshots.load_session_state(&loaded_config);
        assert!(!loaded.running);
        assert_eq!(loaded.remaining_secs, 12.5);
        assert_eq!(loaded.phase, Phase::Break);
    }

    #[test]
    fn task_lists_roundtrip() {
        let snapshots = Snapshots::new(MemoryStorage::new());
        let lists = TaskLists {
            backlog: vec![Task::new("plan")],
            active: vec![],
            completed: vec![Task {
                completed: true,
                ..Task::new("done")
            }],
        };
        snapshots.save_task_lists(&lists).unwrap();
        assert_eq!(snapshots.load_task_lists(), lists);
    }

    #[test]
    fn write_failure_is_reported() {
        let snapshots = Snapshots::new(MemoryStorage::failing_writes());
        assert!(snapshots.save_task_lists(&TaskLists::default()).is_err());
    }
}
