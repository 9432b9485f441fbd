//! Schema diffing for generating migrations.
//!
//! The differ only ever plans additive changes: tables missing from the live
//! schema are created, and fields missing from existing tables are added.
//! Tables and fields present only in the live schema are left alone, and a
//! field whose definition changed but whose name did not is not reported.
//!
//! Table and field names are compared ignoring ASCII case, the way SQLite
//! resolves identifiers.

use indexmap::IndexMap;

use crate::schema::{DesiredSchema, FieldDef, LiveSchema, TableSchema};

/// Changes for a single table.
///
/// The same shape is used for tables to create (every desired field) and for
/// tables to extend (only the missing fields).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDiff {
    /// Table name.
    pub table: String,
    /// Fields to create or add, in declaration order.
    pub fields: IndexMap<String, FieldDef>,
}

impl TableDiff {
    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// A diff between the desired and live schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    /// Tables absent from the live schema.
    pub to_be_created: Vec<TableDiff>,
    /// Tables present in the live schema that are missing fields.
    pub to_be_added: Vec<TableDiff>,
}

impl SchemaDiff {
    /// Check if there are any differences.
    pub fn is_empty(&self) -> bool {
        self.to_be_created.is_empty() && self.to_be_added.is_empty()
    }

    /// Every table diff, creations first.
    pub fn affected(&self) -> impl Iterator<Item = &TableDiff> {
        self.to_be_created.iter().chain(self.to_be_added.iter())
    }

    /// Total number of fields across all table diffs.
    pub fn field_count(&self) -> usize {
        self.affected().map(|t| t.fields.len()).sum()
    }

    /// Get a human-readable summary of the diff.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if !self.to_be_created.is_empty() {
            parts.push(format!("Create {} tables", self.to_be_created.len()));
        }
        if !self.to_be_added.is_empty() {
            let fields: usize = self.to_be_added.iter().map(|t| t.fields.len()).sum();
            parts.push(format!(
                "Add {} fields to {} tables",
                fields,
                self.to_be_added.len()
            ));
        }

        if parts.is_empty() {
            "No changes".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Schema differ for comparing schemas.
pub struct SchemaDiffer<'a> {
    /// Desired state.
    desired: &'a DesiredSchema,
    /// Current store state, if any.
    live: Option<&'a LiveSchema>,
}

impl<'a> SchemaDiffer<'a> {
    /// Create a differ against an empty store.
    pub fn new(desired: &'a DesiredSchema) -> Self {
        Self {
            desired,
            live: None,
        }
    }

    /// Set the live schema.
    pub fn with_live(mut self, live: &'a LiveSchema) -> Self {
        self.live = Some(live);
        self
    }

    /// Compute the diff between schemas.
    pub fn diff(&self) -> SchemaDiff {
        let mut result = SchemaDiff::default();

        for (name, desired_table) in self.desired.tables() {
            if desired_table.fields.is_empty() {
                continue;
            }

            match self.live.and_then(|live| find_table(live, name)) {
                None => result.to_be_created.push(TableDiff {
                    table: name.to_string(),
                    fields: desired_table.fields.clone(),
                }),
                Some(live_table) => {
                    let missing: IndexMap<String, FieldDef> = desired_table
                        .fields
                        .iter()
                        .filter(|(field, _)| !has_field(live_table, field))
                        .map(|(field, def)| (field.clone(), def.clone()))
                        .collect();

                    if !missing.is_empty() {
                        result.to_be_added.push(TableDiff {
                            table: name.to_string(),
                            fields: missing,
                        });
                    }
                }
            }
        }

        result
    }
}

fn find_table<'s>(schema: &'s LiveSchema, name: &str) -> Option<&'s TableSchema> {
    schema.get(name).or_else(|| {
        schema
            .tables()
            .find(|(live, _)| live.eq_ignore_ascii_case(name))
            .map(|(_, table)| table)
    })
}

fn has_field(table: &TableSchema, name: &str) -> bool {
    table.contains_field(name) || table.field_names().any(|f| f.eq_ignore_ascii_case(name))
}

/// Plan the changes needed to bring `live` up to `desired`.
pub fn plan(desired: &DesiredSchema, live: &LiveSchema) -> SchemaDiff {
    SchemaDiffer::new(desired).with_live(live).diff()
}
