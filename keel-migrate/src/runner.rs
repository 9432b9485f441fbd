//! External command execution for delegate tools.

use std::path::Path;

use tokio::process::Command;
use tracing::debug;

use crate::error::{MigrateResult, MigrationError};

/// Terminal status of a finished subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    /// Whether the process reported success.
    pub success: bool,
}

impl CommandStatus {
    /// A successful exit.
    pub fn success() -> Self {
        Self {
            code: Some(0),
            success: true,
        }
    }

    /// A failed exit with the given code.
    pub fn failure(code: i32) -> Self {
        Self {
            code: Some(code),
            success: false,
        }
    }
}

impl std::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Runs external commands to completion.
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program args...` in `cwd`, waiting for it to exit.
    ///
    /// `Err` means the process could not be started at all.
    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> MigrateResult<CommandStatus>;
}

/// Spawns real processes with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

#[async_trait::async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> MigrateResult<CommandStatus> {
        debug!(program, ?args, cwd = %cwd.display(), "Spawning command");

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .await
            .map_err(|e| MigrationError::command(format!("failed to run `{}`: {}", program, e)))?;

        Ok(CommandStatus {
            code: status.code(),
            success: status.success(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(CommandStatus::failure(2).to_string(), "exit code 2");
        assert!(CommandStatus::success().success);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_reports_exit_status() {
        let cwd = std::env::temp_dir();

        let ok = SystemCommandRunner.run("true", &[], &cwd).await.unwrap();
        assert!(ok.success);

        let failed = SystemCommandRunner
            .run("sh", &["-c", "exit 3"], &cwd)
            .await
            .unwrap();
        assert_eq!(failed, CommandStatus::failure(3));
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let err = SystemCommandRunner
            .run("keel-definitely-not-a-program", &[], &std::env::temp_dir())
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::Command(_)));
    }
}
