//! Result of a migration run.

/// How a run ended.
///
/// Only the outermost entry point turns an outcome into a process exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The live schema already satisfies the desired schema.
    NoOpNeeded,
    /// The native plan was applied.
    Applied,
    /// The operator declined the native plan.
    Cancelled,
    /// The delegate tool ran and exited successfully.
    DelegatedSuccess { tool: &'static str },
    /// The operator declined to run the delegate tool.
    DelegatedDeclined {
        tool: &'static str,
        /// Whether this tool treats a decline as a failed run.
        is_failure: bool,
    },
    /// Applying or delegating failed.
    Failed(String),
}

impl ExecutionOutcome {
    /// Whether the run ended without a failure.
    pub fn is_success(&self) -> bool {
        match self {
            ExecutionOutcome::NoOpNeeded
            | ExecutionOutcome::Applied
            | ExecutionOutcome::Cancelled
            | ExecutionOutcome::DelegatedSuccess { .. } => true,
            ExecutionOutcome::DelegatedDeclined { is_failure, .. } => !is_failure,
            ExecutionOutcome::Failed(_) => false,
        }
    }
}
