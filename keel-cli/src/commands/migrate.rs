//! `keel migrate` - Bring the database schema in line with the configuration.

use std::path::{Path, PathBuf};

use keel_migrate::{
    EngineOptions, ExecutionOutcome, MigrationEngine, SqliteConnector, SystemCommandRunner,
    resolve,
};
use tracing::debug;

use crate::cli::MigrateArgs;
use crate::config::load_configuration;
use crate::error::{CliError, CliResult};
use crate::output::{self, TerminalConfirm, TerminalReporter};

/// Printed when the live schema already matches
pub const NO_MIGRATIONS: &str = "No migrations needed.";

/// Printed after a native plan was applied
pub const MIGRATION_COMPLETED: &str = "Migration was completed successfully!";

/// Printed when the operator declines
pub const MIGRATION_CANCELLED: &str = "Migration cancelled.";

/// Run the migrate command.
///
/// Fatal conditions are returned as errors; everything else, including
/// declines and failed applies, comes back as an outcome for `main` to map.
pub async fn run(args: MigrateArgs) -> CliResult<ExecutionOutcome> {
    let cwd = working_dir(&args.cwd)?;

    let config = load_configuration(&cwd, args.config.as_deref())?
        .ok_or_else(|| CliError::ConfigurationNotFound(cwd.clone()))?;
    let descriptor = resolve(&config.to_adapter_config()?)?;

    output::header("Migrate");
    output::kv("Directory", &cwd.display().to_string());
    output::kv("Adapter", &descriptor.id.to_string());
    output::newline();

    let mut engine = MigrationEngine::new(
        EngineOptions::new()
            .auto_confirm(args.yes)
            .working_dir(&cwd),
        TerminalConfirm,
        TerminalReporter::default(),
        SystemCommandRunner,
        SqliteConnector::new(&cwd),
    );

    let outcome = engine.run(&descriptor, &config.tables).await?;
    debug!(?outcome, "Migration finished");
    report(&outcome);

    Ok(outcome)
}

/// Process exit code for an outcome.
pub fn exit_code(outcome: &ExecutionOutcome) -> i32 {
    if outcome.is_success() { 0 } else { 1 }
}

/// Resolve `dir` against the current directory and make sure it exists.
fn working_dir(dir: &Path) -> CliResult<PathBuf> {
    let dir = std::env::current_dir()?.join(dir);
    if !dir.is_dir() {
        return Err(CliError::DirectoryNotFound(dir));
    }
    Ok(dir.canonicalize()?)
}

fn report(outcome: &ExecutionOutcome) {
    match outcome {
        ExecutionOutcome::NoOpNeeded => output::success(NO_MIGRATIONS),
        ExecutionOutcome::Applied => output::success(MIGRATION_COMPLETED),
        ExecutionOutcome::Cancelled => output::info(MIGRATION_CANCELLED),
        ExecutionOutcome::DelegatedSuccess { tool } => {
            output::success(&format!("{} migration completed successfully!", tool))
        }
        ExecutionOutcome::DelegatedDeclined { is_failure, .. } => {
            if *is_failure {
                output::error(MIGRATION_CANCELLED)
            } else {
                output::info(MIGRATION_CANCELLED)
            }
        }
        ExecutionOutcome::Failed(reason) => output::error(reason),
    }
}
