//! Error types for the migration engine.

use thiserror::Error;

/// Result type alias for migration operations.
pub type MigrateResult<T> = Result<T, MigrationError>;

/// Errors that can occur during migration operations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// No storage backend can be constructed from the configuration.
    #[error("Invalid database configuration: {0}")]
    InvalidConfiguration(String),

    /// The configured backend kind is unknown.
    #[error("Unsupported adapter '{0}'")]
    UnsupportedAdapter(String),

    /// The backend is known but has no migration capability.
    #[error("Adapter '{0}' does not support migrations")]
    NonMigratableAdapter(String),

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database operation error.
    #[error("Database error: {0}")]
    Database(String),

    /// External command could not be spawned or failed.
    #[error("Command error: {0}")]
    Command(String),

    /// Confirmation gate misuse.
    #[error("Confirmation gate error: {0}")]
    Gate(String),

    /// General migration error.
    #[error("Migration error: {0}")]
    Other(String),
}

impl MigrationError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a database error.
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a command error.
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    /// Create an other error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<tokio_rusqlite::Error> for MigrationError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<rusqlite::Error> for MigrationError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}
