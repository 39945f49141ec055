//! Core error types for pomotodo-core.
//!
//! The only recoverable failures live at the storage and notification
//! boundaries. Everything else is either a rejected input
//! ([`ValidationError`], [`TaskError`]) or a total operation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomotodo-core.
///
/// Hosts collect every per-area error into this one type.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected setting values
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Rejected task list operations
    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open storage at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Read or write against the backing store failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A record could not be serialized for writing
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A stored record exists but cannot be decoded
    #[error("Stored record '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration or a value for it
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors raised at the settings boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Non-numeric or non-positive setting value. The prior value is kept.
    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidSettingValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Task list operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task content was empty or whitespace
    #[error("Task content must not be empty")]
    EmptyContent,

    /// The operation is not defined for the named list
    #[error("'{operation}' is not supported on the {list} list")]
    UnsupportedList {
        operation: &'static str,
        list: String,
    },

    /// Text did not name a list
    #[error("Unknown list: {0}")]
    UnknownList(String),

    /// Text was not a valid task id
    #[error("Invalid task id: {0}")]
    InvalidId(String),
}

/// Notification delivery errors. The core never propagates these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Notification permission denied")]
    PermissionDenied,

    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
