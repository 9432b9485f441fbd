//! # keel-migrate
//!
//! Migration engine for Keel.
//!
//! This crate provides functionality for:
//! - Resolving a configured adapter to a native store or an external tool
//! - Additive schema diffing between the declared schema and the live store
//! - SQL generation and application for SQLite
//! - A single confirmation gate before anything is changed
//! - Handing control to `prisma` or `drizzle-kit` when they own the schema
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌────────────────┐
//! │ AdapterConfig│────▶│    resolve     │
//! └──────────────┘     └────────────────┘
//!                        │            │
//!                 native ▼            ▼ delegate
//!              ┌────────────────┐   ┌─────────────┐
//!              │  Introspect +  │   │ Delegate    │
//!              │  Schema Differ │   │ Tool        │
//!              └────────────────┘   └─────────────┘
//!                        │            │
//!                        ▼            ▼
//!                  ┌──────────────────────┐
//!                  │  Confirmation Gate   │
//!                  └──────────────────────┘
//!                             │
//!                             ▼
//!                  ┌──────────────────────┐
//!                  │  Executor ─▶ Outcome │
//!                  └──────────────────────┘
//! ```
//!
//! Changes are additive only: missing tables are created and missing fields
//! are added. Nothing is ever dropped, renamed or altered.
//!
//! ## Example
//!
//! ```rust,ignore
//! use keel_migrate::{
//!     AdapterConfig, EngineOptions, MigrationEngine, NullReporter, Schema,
//!     SqliteConnector, SystemCommandRunner, resolve,
//! };
//!
//! async fn run(desired: Schema, confirm: impl keel_migrate::Confirm) -> keel_migrate::MigrateResult<()> {
//!     let descriptor = resolve(&AdapterConfig::new("sqlite").url("./dev.db"))?;
//!
//!     let mut engine = MigrationEngine::new(
//!         EngineOptions::new().working_dir("."),
//!         confirm,
//!         NullReporter,
//!         SystemCommandRunner,
//!         SqliteConnector::new("."),
//!     );
//!
//!     let outcome = engine.run(&descriptor, &desired).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod diff;
pub mod engine;
pub mod error;
pub mod executor;
pub mod gate;
pub mod outcome;
pub mod planner;
pub mod report;
pub mod runner;
pub mod schema;
pub mod sql;
pub mod sqlite;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use adapter::{
    AdapterConfig, AdapterDescriptor, AdapterId, Capability, DRIZZLE, DelegateTool, Dialect,
    NativeTarget, PRISMA, resolve,
};
pub use diff::{SchemaDiff, SchemaDiffer, TableDiff, plan};
pub use engine::{EngineOptions, MigrationEngine};
pub use error::{MigrateResult, MigrationError};
pub use executor::{ExecutionTarget, MigrationExecutor};
pub use gate::{Approval, Confirm, ConfirmationGate, GateState, GateSubject, PLAN_QUESTION};
pub use outcome::ExecutionOutcome;
pub use planner::{MigrationPlan, compute_migrations};
pub use report::{NullReporter, Reporter};
pub use runner::{CommandRunner, CommandStatus, SystemCommandRunner};
pub use schema::{
    DesiredSchema, FieldDef, FieldReference, FieldType, LiveSchema, OnDelete, Schema, TableSchema,
};
pub use sql::{SqlBatch, SqliteSqlGenerator};
pub use sqlite::{SqliteConnector, SqliteStore};
pub use store::{SchemaStore, StoreConnector};
