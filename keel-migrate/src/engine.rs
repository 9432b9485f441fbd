//! Migration engine implementation.
//!
//! Ties the pieces together for one run: a resolved adapter goes either down
//! the native path (connect, introspect, plan, confirm, apply) or the delegate
//! path (confirm, spawn). Each step starts only after the previous finished.

use std::path::PathBuf;

use tracing::info;

use crate::adapter::{AdapterDescriptor, Capability};
use crate::error::MigrateResult;
use crate::executor::{ExecutionTarget, MigrationExecutor};
use crate::gate::{Confirm, ConfirmationGate, GateSubject};
use crate::outcome::ExecutionOutcome;
use crate::planner::compute_migrations;
use crate::report::Reporter;
use crate::runner::CommandRunner;
use crate::schema::DesiredSchema;
use crate::store::StoreConnector;

/// Options for a single run.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Skip the confirmation prompt.
    pub auto_confirm: bool,
    /// Directory delegate tools run in.
    pub working_dir: PathBuf,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            auto_confirm: false,
            working_dir: PathBuf::from("."),
        }
    }
}

impl EngineOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set auto-confirm.
    pub fn auto_confirm(mut self, auto_confirm: bool) -> Self {
        self.auto_confirm = auto_confirm;
        self
    }

    /// Set the working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }
}

/// The main migration engine.
pub struct MigrationEngine<C, R, X, K> {
    options: EngineOptions,
    confirm: C,
    reporter: R,
    runner: X,
    connector: K,
}

impl<C, R, X, K> MigrationEngine<C, R, X, K>
where
    C: Confirm,
    R: Reporter,
    X: CommandRunner,
    K: StoreConnector,
{
    /// Create a new migration engine.
    pub fn new(options: EngineOptions, confirm: C, reporter: R, runner: X, connector: K) -> Self {
        Self {
            options,
            confirm,
            reporter,
            runner,
            connector,
        }
    }

    /// Run one migration.
    ///
    /// Connection and introspection failures are returned as errors. Failures
    /// while applying are returned as [`ExecutionOutcome::Failed`].
    pub async fn run(
        &mut self,
        descriptor: &AdapterDescriptor,
        desired: &DesiredSchema,
    ) -> MigrateResult<ExecutionOutcome> {
        info!(adapter = %descriptor.id, native = descriptor.is_native(), "Starting migration");

        let mut gate = ConfirmationGate::new(self.options.auto_confirm);
        let executor = MigrationExecutor::new(&self.runner, &self.options.working_dir);

        match &descriptor.capability {
            Capability::Native(target) => {
                self.reporter.start("preparing migration...");
                let prepared = match self.connector.connect(target).await {
                    Ok(store) => compute_migrations(store, desired).await,
                    Err(e) => Err(e),
                };
                self.reporter.stop();
                let plan = prepared?;

                if plan.is_empty() {
                    info!("Schema is up to date");
                    return Ok(ExecutionOutcome::NoOpNeeded);
                }

                let approval = gate.decide(
                    GateSubject::Plan(plan.diff()),
                    &mut self.confirm,
                    &mut self.reporter,
                )?;

                Ok(executor
                    .execute(ExecutionTarget::Native(plan), approval, &mut self.reporter)
                    .await)
            }
            Capability::Delegate(tool) => {
                let approval = gate.decide(
                    GateSubject::Delegate(tool),
                    &mut self.confirm,
                    &mut self.reporter,
                )?;

                Ok(executor
                    .execute(
                        ExecutionTarget::<K::Store>::Delegate(tool),
                        approval,
                        &mut self.reporter,
                    )
                    .await)
            }
        }
    }
}
