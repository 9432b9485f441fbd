//! Native store abstraction.
//!
//! A store knows how to report its current shape and how to execute the DDL
//! for a single table diff. Ordering across diffs is the planner's concern.

use crate::adapter::NativeTarget;
use crate::diff::TableDiff;
use crate::error::MigrateResult;
use crate::schema::LiveSchema;

/// A store the engine can introspect and migrate directly.
#[async_trait::async_trait]
pub trait SchemaStore: Send {
    /// Read the current shape of the store. Must not mutate anything.
    async fn introspect(&self) -> MigrateResult<LiveSchema>;

    /// Create a table with every field in the diff.
    ///
    /// Returns a warning for each declared constraint the store left out.
    async fn create_table(&mut self, table: &TableDiff) -> MigrateResult<Vec<String>>;

    /// Add the diff's fields to an existing table.
    ///
    /// Returns a warning for each declared constraint the store left out.
    async fn add_fields(&mut self, table: &TableDiff) -> MigrateResult<Vec<String>>;
}

/// Opens native stores for resolved targets.
#[async_trait::async_trait]
pub trait StoreConnector: Send + Sync {
    /// The store type produced.
    type Store: SchemaStore;

    /// Open a session against the target.
    async fn connect(&self, target: &NativeTarget) -> MigrateResult<Self::Store>;
}
