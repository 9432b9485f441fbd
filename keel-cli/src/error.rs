//! CLI error types and result alias.

use std::path::PathBuf;

use keel_migrate::MigrationError;
use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Working directory does not exist
    #[error("Directory {} does not exist", .0.display())]
    #[diagnostic(code(keel::directory), help("pass an existing directory with --cwd"))]
    DirectoryNotFound(PathBuf),

    /// No configuration file found
    #[error("No configuration file found in {}", .0.display())]
    #[diagnostic(
        code(keel::config_not_found),
        help("create keel.toml or pass its location with --config")
    )]
    ConfigurationNotFound(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(keel::config))]
    Config(String),

    /// Migration error
    #[error(transparent)]
    #[diagnostic(code(keel::migration))]
    Migration(#[from] MigrationError),

    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(keel::io))]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(format!("Failed to parse TOML: {}", err))
    }
}
