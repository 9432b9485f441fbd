//! Confirmation gate.
//!
//! Every structural change passes through a gate exactly once per run. A
//! native plan is always shown first. The gate then either approves
//! automatically (operator opted in up front) or blocks on a single yes/no
//! answer.
//!
//! ```text
//! Idle ──▶ PlanReady ──▶ AutoApproved ─────────────▶ Approved
//!                   └──▶ AwaitingOperator ──┬──────▶ Approved
//!                                           └──────▶ Cancelled
//! ```

use tracing::info;

use crate::adapter::DelegateTool;
use crate::diff::SchemaDiff;
use crate::error::{MigrateResult, MigrationError};
use crate::report::Reporter;

/// Question asked before applying a native plan.
pub const PLAN_QUESTION: &str = "Are you sure you want to run these migrations?";

/// Source of yes/no answers.
pub trait Confirm {
    /// Ask a yes/no question. Blocks until answered.
    fn ask(&mut self, question: &str) -> bool;
}

/// Gate states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    PlanReady,
    AutoApproved,
    AwaitingOperator,
    Approved,
    Cancelled,
}

/// What the operator is asked to approve.
#[derive(Debug, Clone, Copy)]
pub enum GateSubject<'a> {
    /// A native plan, presented as a table/field summary.
    Plan(&'a SchemaDiff),
    /// Handing control to an external tool.
    Delegate(&'a DelegateTool),
}

/// The gate's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    Approved,
    Cancelled,
}

impl Approval {
    /// Whether the change may proceed.
    pub fn is_approved(&self) -> bool {
        matches!(self, Approval::Approved)
    }
}

/// Run-scoped confirmation state machine.
#[derive(Debug)]
pub struct ConfirmationGate {
    auto_confirm: bool,
    state: GateState,
}

impl ConfirmationGate {
    /// Create a gate; `auto_confirm` skips the prompt.
    pub fn new(auto_confirm: bool) -> Self {
        Self {
            auto_confirm,
            state: GateState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Present the subject and decide whether to proceed.
    ///
    /// A gate decides once; calling this again is an error.
    pub fn decide<C, R>(
        &mut self,
        subject: GateSubject<'_>,
        confirm: &mut C,
        reporter: &mut R,
    ) -> MigrateResult<Approval>
    where
        C: Confirm + ?Sized,
        R: Reporter + ?Sized,
    {
        if self.state != GateState::Idle {
            return Err(MigrationError::Gate(format!(
                "gate already used (state: {:?})",
                self.state
            )));
        }
        self.state = GateState::PlanReady;

        if let GateSubject::Plan(diff) = subject {
            reporter.info("The migration will affect the following:");
            for table in diff.affected() {
                reporter.table_change(table);
            }
        }

        if self.auto_confirm {
            self.state = GateState::AutoApproved;
            info!("Auto-confirm set, skipping prompt");
            self.state = GateState::Approved;
            return Ok(Approval::Approved);
        }

        self.state = GateState::AwaitingOperator;
        let question = match subject {
            GateSubject::Plan(_) => PLAN_QUESTION.to_string(),
            GateSubject::Delegate(tool) => tool.question(),
        };

        let approval = if confirm.ask(&question) {
            self.state = GateState::Approved;
            Approval::Approved
        } else {
            self.state = GateState::Cancelled;
            Approval::Cancelled
        };

        info!(?approval, "Operator answered");
        Ok(approval)
    }
}
