mod config;
pub mod database;
pub mod memory;
pub mod snapshot;

pub use config::{Config, LoggingConfig, NotificationsConfig, SessionDefaults};
pub use database::SqliteStorage;
pub use memory::MemoryStorage;
pub use snapshot::{Snapshots, TASK_LISTS_KEY, SESSION_CONFIG_KEY, SESSION_STATE_KEY};

use std::path::PathBuf;
use std::rc::Rc;

use crate::error::StorageError;

/// Key-value persistence for JSON records.
///
/// Writes are synchronous. Callers treat failures as non-fatal.
pub trait StoragePort {
    /// Read a record. `Ok(None)` when the key was never written.
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError>;
}

impl<S: StoragePort + ?Sized> StoragePort for Rc<S> {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        (**self).save(key, value)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `POMOTODO_DATA_DIR` wins when set. Otherwise `~/.config/pomotodo[-dev]/`
/// based on `POMOTODO_ENV` (set it to `dev` for the development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("POMOTODO_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOTODO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomotodo-dev")
            } else {
                base_dir.join("pomotodo")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
