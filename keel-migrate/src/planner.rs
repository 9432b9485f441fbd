//! Native migration planning.

use tracing::{debug, info};

use crate::diff::{SchemaDiff, plan};
use crate::error::MigrateResult;
use crate::report::Reporter;
use crate::schema::DesiredSchema;
use crate::store::SchemaStore;

/// A computed diff bound to the store it was planned against.
///
/// Applying consumes the plan; a plan is never reused or persisted.
pub struct MigrationPlan<S: SchemaStore> {
    diff: SchemaDiff,
    store: S,
}

impl<S: SchemaStore> MigrationPlan<S> {
    /// Bind a diff to a store.
    pub fn new(diff: SchemaDiff, store: S) -> Self {
        Self { diff, store }
    }

    /// The planned changes.
    pub fn diff(&self) -> &SchemaDiff {
        &self.diff
    }

    /// Check if there's anything to migrate.
    pub fn is_empty(&self) -> bool {
        self.diff.is_empty()
    }

    /// Give back the store without applying anything.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Apply every table creation, then every field addition.
    ///
    /// Constraints the store could not apply are passed to `reporter` as
    /// warnings. Stops at the first failure; statements that already ran are
    /// not undone.
    pub async fn apply<R>(mut self, reporter: &mut R) -> MigrateResult<S>
    where
        R: Reporter + ?Sized,
    {
        for table in &self.diff.to_be_created {
            info!(table = %table.table, fields = table.fields.len(), "Creating table");
            for warning in self.store.create_table(table).await? {
                reporter.warn(&warning);
            }
        }

        for table in &self.diff.to_be_added {
            info!(table = %table.table, fields = table.fields.len(), "Adding fields");
            for warning in self.store.add_fields(table).await? {
                reporter.warn(&warning);
            }
        }

        Ok(self.store)
    }
}

/// Introspect the store and plan the changes needed to reach `desired`.
pub async fn compute_migrations<S: SchemaStore>(
    store: S,
    desired: &DesiredSchema,
) -> MigrateResult<MigrationPlan<S>> {
    let live = store.introspect().await?;
    let diff = plan(desired, &live);
    debug!(
        summary = %diff.summary(),
        fields = diff.field_count(),
        "Computed schema diff"
    );
    Ok(MigrationPlan::new(diff, store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NullReporter;
    use crate::testing::{FakeStore, RecordingReporter, StoreCall};
    use crate::schema::{FieldDef, FieldType, Schema, TableSchema};
    use pretty_assertions::assert_eq;

    fn table(fields: &[&str]) -> TableSchema {
        fields.iter().fold(TableSchema::new(), |t, name| {
            t.field(*name, FieldDef::new(FieldType::String))
        })
    }

    #[tokio::test]
    async fn test_compute_does_not_mutate() {
        let store = FakeStore::new(Schema::new().table("user", table(&["id"])));
        let desired = Schema::new()
            .table("user", table(&["id", "email"]))
            .table("session", table(&["id"]));

        let plan = compute_migrations(store, &desired).await.unwrap();

        assert!(!plan.is_empty());
        let store = plan.into_store();
        assert_eq!(store.calls(), vec![StoreCall::Introspect]);
    }

    #[tokio::test]
    async fn test_creation_precedes_addition() {
        let store = FakeStore::new(
            Schema::new()
                .table("user", table(&["id"]))
                .table("account", table(&["id"])),
        );
        let desired = Schema::new()
            .table("account", table(&["id", "provider"]))
            .table("session", table(&["id"]))
            .table("user", table(&["id", "email"]))
            .table("verification", table(&["id"]));

        let store = compute_migrations(store, &desired)
            .await
            .unwrap()
            .apply(&mut NullReporter)
            .await
            .unwrap();

        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Introspect,
                StoreCall::CreateTable("session".to_string()),
                StoreCall::CreateTable("verification".to_string()),
                StoreCall::AddFields("account".to_string()),
                StoreCall::AddFields("user".to_string()),
            ]
        );
        assert_eq!(store.live(), desired);
    }

    #[tokio::test]
    async fn test_apply_stops_at_first_failure() {
        let store = FakeStore::new(Schema::new()).fail_on("second");
        let desired = Schema::new()
            .table("first", table(&["id"]))
            .table("second", table(&["id"]))
            .table("third", table(&["id"]));

        let err = compute_migrations(store, &desired)
            .await
            .unwrap()
            .apply(&mut NullReporter)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("second"));
    }

    #[tokio::test]
    async fn test_dropped_constraints_reach_the_reporter() {
        let store = FakeStore::new(Schema::new().table("user", table(&["id"])))
            .warn_on("user", "\"user\".\"email\" added as nullable");
        let desired = Schema::new().table("user", table(&["id", "email"]));
        let mut reporter = RecordingReporter::default();

        compute_migrations(store, &desired)
            .await
            .unwrap()
            .apply(&mut reporter)
            .await
            .unwrap();

        assert_eq!(
            reporter.warnings,
            vec!["\"user\".\"email\" added as nullable".to_string()]
        );
    }
}
