//! Error handling module for setupkit
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Library code returns these; the CLI boundary wraps them with anyhow context.

use thiserror::Error;

/// Main error type for setupkit
#[derive(Error, Debug)]
pub enum SetupError {
    /// IO errors (file operations, symlinks, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// External command errors (spawn failure, abnormal exit)
    #[error("Command error: {0}")]
    Command(String),

    /// Device topology supplied by the partitioning step is inconsistent
    #[error("Invalid device topology: {0}")]
    Topology(String),

    /// Timezone dataset errors
    #[error("Timezone data error: {0}")]
    Timezone(String),

    /// Global storage errors (a stored value has the wrong shape)
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type alias for setupkit operations
pub type Result<T> = std::result::Result<T, SetupError>;

impl SetupError {
    /// Create a command error
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    /// Create a topology error
    pub fn topology(msg: impl Into<String>) -> Self {
        Self::Topology(msg.into())
    }

    /// Create a timezone data error
    pub fn timezone(msg: impl Into<String>) -> Self {
        Self::Timezone(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
