//! Core error types for gridfault-core.
//!
//! This module defines the error hierarchy using thiserror. Every fallible
//! operation in the library surfaces one of these types; the reminder engine
//! itself never returns errors to its caller and only logs them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for gridfault-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Report store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Notification dispatch errors
    #[error("Notify error: {0}")]
    Notify(#[from] NotifyError),

    /// Domain invariant violations
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Report-store-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open report store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Report store migration failed: {0}")]
    MigrationFailed(String),

    /// No report with the given id
    #[error("No report with id '{0}'")]
    NotFound(String),

    /// Database is locked
    #[error("Report store is locked")]
    Locked,

    /// Connection mutex poisoned by a panicking writer
    #[error("Report store connection poisoned")]
    Poisoned,
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Notification-dispatch errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The mail relay rejected the request
    #[error("Mail relay returned HTTP {status}")]
    Http { status: u16 },

    /// The request never completed
    #[error("Mail relay request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Relay endpoint is not a usable URL
    #[error("Invalid relay endpoint: {0}")]
    Endpoint(String),
}

/// Domain invariant violations.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Report lifecycle is forward-only
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Warning flags are monotonic and status-gated
    #[error("Warning '{warning}' not applicable while status is {status}")]
    WarningNotApplicable { warning: String, status: String },

    /// Unknown enumeration value
    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            rusqlite::Error::QueryReturnedNoRows => {
                StoreError::QueryFailed("query returned no rows".to_string())
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
