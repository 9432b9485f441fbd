//! Migration execution.

use std::path::Path;

use tracing::{error, info};

use crate::adapter::DelegateTool;
use crate::gate::Approval;
use crate::outcome::ExecutionOutcome;
use crate::planner::MigrationPlan;
use crate::report::Reporter;
use crate::runner::CommandRunner;
use crate::store::SchemaStore;

/// What an approved run acts on.
pub enum ExecutionTarget<'a, S: SchemaStore> {
    /// Apply a native plan.
    Native(MigrationPlan<S>),
    /// Hand control to an external tool.
    Delegate(&'a DelegateTool),
}

/// Performs approved changes.
pub struct MigrationExecutor<'a, X: CommandRunner + ?Sized> {
    runner: &'a X,
    working_dir: &'a Path,
}

impl<'a, X: CommandRunner + ?Sized> MigrationExecutor<'a, X> {
    /// Create an executor spawning delegates in `working_dir`.
    pub fn new(runner: &'a X, working_dir: &'a Path) -> Self {
        Self {
            runner,
            working_dir,
        }
    }

    /// Execute the target if approved.
    ///
    /// Failures are reported as [`ExecutionOutcome::Failed`]; nothing is
    /// retried and partial changes are not rolled back.
    pub async fn execute<S, R>(
        &self,
        target: ExecutionTarget<'_, S>,
        approval: Approval,
        reporter: &mut R,
    ) -> ExecutionOutcome
    where
        S: SchemaStore,
        R: Reporter + ?Sized,
    {
        match (target, approval) {
            (ExecutionTarget::Native(_), Approval::Cancelled) => ExecutionOutcome::Cancelled,
            (ExecutionTarget::Delegate(tool), Approval::Cancelled) => {
                ExecutionOutcome::DelegatedDeclined {
                    tool: tool.name,
                    is_failure: tool.decline_is_failure,
                }
            }
            (ExecutionTarget::Native(plan), Approval::Approved) => {
                reporter.start("migrating...");
                let result = plan.apply(&mut *reporter).await;
                reporter.stop();

                match result {
                    Ok(_) => {
                        info!("Migration applied");
                        ExecutionOutcome::Applied
                    }
                    Err(e) => {
                        error!(error = %e, "Migration failed");
                        ExecutionOutcome::Failed(e.to_string())
                    }
                }
            }
            (ExecutionTarget::Delegate(tool), Approval::Approved) => {
                self.run_delegate(tool, reporter).await
            }
        }
    }

    async fn run_delegate<R>(&self, tool: &DelegateTool, reporter: &mut R) -> ExecutionOutcome
    where
        R: Reporter + ?Sized,
    {
        reporter.start(&format!("running {} {}...", tool.name, tool.action));
        let result = self
            .runner
            .run(tool.command, tool.args, self.working_dir)
            .await;
        reporter.stop();

        match result {
            Ok(status) if status.success => {
                info!(tool = tool.name, "Delegate tool succeeded");
                ExecutionOutcome::DelegatedSuccess { tool: tool.name }
            }
            Ok(status) => {
                error!(tool = tool.name, %status, "Delegate tool failed");
                ExecutionOutcome::Failed(format!("`{}` failed with {}", tool.command_line(), status))
            }
            Err(e) => {
                error!(tool = tool.name, error = %e, "Delegate tool could not be started");
                ExecutionOutcome::Failed(e.to_string())
            }
        }
    }
}
