//! SQL generation for migrations.

use crate::diff::TableDiff;
use crate::schema::{FieldDef, FieldType};

/// Statements generated for one table diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlBatch {
    /// Statements, in execution order.
    pub statements: Vec<String>,
    /// Constraints that could not be expressed and were dropped.
    pub warnings: Vec<String>,
}

impl SqlBatch {
    /// Join the statements into a single script.
    pub fn to_sql(&self) -> String {
        self.statements.join("\n")
    }

    /// Check if there is nothing to execute.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// SQL generator for SQLite.
pub struct SqliteSqlGenerator;

impl SqliteSqlGenerator {
    /// Generate a `CREATE TABLE` statement carrying every field of the diff.
    pub fn create_table(&self, table: &TableDiff) -> SqlBatch {
        let columns: Vec<String> = table
            .fields
            .iter()
            .map(|(name, def)| self.column_definition(name, def, true))
            .collect();

        SqlBatch {
            statements: vec![format!(
                "CREATE TABLE {} (\n    {}\n);",
                quote_ident(&table.table),
                columns.join(",\n    ")
            )],
            warnings: Vec::new(),
        }
    }

    /// Generate one `ALTER TABLE ... ADD COLUMN` per field of the diff.
    ///
    /// SQLite cannot add primary key or unique columns, nor `NOT NULL` columns
    /// without a default; those constraints are left out and reported.
    pub fn add_columns(&self, table: &TableDiff) -> SqlBatch {
        let mut batch = SqlBatch::default();

        for (name, def) in &table.fields {
            if def.primary_key {
                batch.warnings.push(format!(
                    "\"{}\".\"{}\" added without PRIMARY KEY",
                    table.table, name
                ));
            }
            if def.unique {
                batch.warnings.push(format!(
                    "\"{}\".\"{}\" added without UNIQUE",
                    table.table, name
                ));
            }
            if def.required {
                batch.warnings.push(format!(
                    "\"{}\".\"{}\" added as nullable",
                    table.table, name
                ));
            }

            batch.statements.push(format!(
                "ALTER TABLE {} ADD COLUMN {};",
                quote_ident(&table.table),
                self.column_definition(name, def, false)
            ));
        }

        batch
    }

    /// Generate column definition.
    fn column_definition(&self, name: &str, def: &FieldDef, with_constraints: bool) -> String {
        let mut parts = vec![quote_ident(name), sql_type(def.field_type).to_string()];

        if with_constraints {
            if def.primary_key {
                parts.push("PRIMARY KEY".to_string());
            } else {
                if def.required {
                    parts.push("NOT NULL".to_string());
                }
                if def.unique {
                    parts.push("UNIQUE".to_string());
                }
            }
        }

        if let Some(reference) = &def.references {
            parts.push(format!(
                "REFERENCES {} ({}) ON DELETE {}",
                quote_ident(&reference.table),
                quote_ident(&reference.field),
                reference.on_delete.as_sql().to_uppercase()
            ));
        }

        parts.join(" ")
    }
}

/// Map a logical field type to its SQLite column type.
pub fn sql_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::String => "TEXT",
        FieldType::Number => "INTEGER",
        FieldType::Boolean => "BOOLEAN",
        FieldType::Date => "DATE",
        FieldType::Json => "JSON",
    }
}

/// Map a declared SQLite column type back to a logical field type.
pub fn field_type_from_sql(declared: &str) -> FieldType {
    let declared = declared.trim().to_ascii_lowercase();
    match declared.as_str() {
        "integer" | "int" | "bigint" | "real" | "numeric" | "double" | "float" => {
            FieldType::Number
        }
        "boolean" | "bool" => FieldType::Boolean,
        "date" | "datetime" | "timestamp" => FieldType::Date,
        "json" | "jsonb" => FieldType::Json,
        _ => FieldType::String,
    }
}

/// Double-quote an identifier, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
