//! Structural schema model shared by the desired and live sides of a migration.
//!
//! Both sides use the same shape: an ordered map of table names to tables, each
//! an ordered map of field names to [`FieldDef`]s. Ordering is the declaration
//! order and drives the order in which changes are planned and applied.

use indexmap::IndexMap;
use serde::Deserialize;

/// The shape of a store, keyed by table name in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    tables: IndexMap<String, TableSchema>,
}

/// The schema the application declares it needs.
pub type DesiredSchema = Schema;

/// The schema currently present in the store.
pub type LiveSchema = Schema;

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table (builder style).
    pub fn table(mut self, name: impl Into<String>, table: TableSchema) -> Self {
        self.insert_table(name, table);
        self
    }

    /// Insert or replace a table.
    pub fn insert_table(&mut self, name: impl Into<String>, table: TableSchema) {
        self.tables.insert(name.into(), table);
    }

    /// Look up a table by name.
    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Look up a table by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut TableSchema> {
        self.tables.get_mut(name)
    }

    /// Check whether a table exists.
    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Iterate over tables in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &TableSchema)> {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the schema has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// A single table: ordered field definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TableSchema {
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: IndexMap<String, FieldDef>,
}

impl TableSchema {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field (builder style).
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    /// Check whether a field exists.
    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Logical field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Json,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Number => write!(f, "number"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Date => write!(f, "date"),
            FieldType::Json => write!(f, "json"),
        }
    }
}

/// Referential action on delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    #[default]
    Cascade,
    Restrict,
    SetNull,
    NoAction,
}

impl OnDelete {
    /// SQL spelling of the action.
    pub fn as_sql(&self) -> &'static str {
        match self {
            OnDelete::Cascade => "cascade",
            OnDelete::Restrict => "restrict",
            OnDelete::SetNull => "set null",
            OnDelete::NoAction => "no action",
        }
    }
}

/// Foreign key target of a field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldReference {
    /// Referenced table.
    pub table: String,
    /// Referenced field.
    pub field: String,
    /// Action when the referenced row is deleted.
    #[serde(default)]
    pub on_delete: OnDelete,
}

/// Type and constraint metadata of a field.
///
/// In configuration files a field is either a bare type (`email = "string"`)
/// or an inline table (`id = { type = "string", primary_key = true }`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFieldDef")]
pub struct FieldDef {
    pub field_type: FieldType,
    pub required: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub references: Option<FieldReference>,
}

impl FieldDef {
    /// Create an optional, unconstrained field of the given type.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            unique: false,
            primary_key: false,
            references: None,
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field as unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark the field as the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Reference another table's field, cascading on delete.
    pub fn references(mut self, table: impl Into<String>, field: impl Into<String>) -> Self {
        self.references = Some(FieldReference {
            table: table.into(),
            field: field.into(),
            on_delete: OnDelete::default(),
        });
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldDef {
    Bare(FieldType),
    Full {
        #[serde(rename = "type")]
        field_type: FieldType,
        #[serde(default)]
        required: bool,
        #[serde(default)]
        unique: bool,
        #[serde(default)]
        primary_key: bool,
        #[serde(default)]
        references: Option<FieldReference>,
    },
}

impl From<RawFieldDef> for FieldDef {
    fn from(raw: RawFieldDef) -> Self {
        match raw {
            RawFieldDef::Bare(field_type) => FieldDef::new(field_type),
            RawFieldDef::Full {
                field_type,
                required,
                unique,
                primary_key,
                references,
            } => FieldDef {
                field_type,
                required,
                unique,
                primary_key,
                references,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_preserves_declaration_order() {
        let schema = Schema::new()
            .table(
                "user",
                TableSchema::new()
                    .field("id", FieldDef::new(FieldType::String).primary_key())
                    .field("name", FieldDef::new(FieldType::String)),
            )
            .table("account", TableSchema::new());

        let names: Vec<_> = schema.tables().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["user", "account"]);

        let fields: Vec<_> = schema.get("user").unwrap().field_names().collect();
        assert_eq!(fields, vec!["id", "name"]);
    }

    #[test]
    fn test_deserialize_bare_and_full_fields() {
        let toml = r#"
[user.fields]
id = { type = "string", primary_key = true }
email = { type = "string", required = true, unique = true }
age = "number"

[session.fields]
user_id = { type = "string", references = { table = "user", field = "id", on_delete = "set_null" } }
"#;
        let schema: Schema = toml::from_str(toml).unwrap();

        let user = schema.get("user").unwrap();
        assert_eq!(user.fields["age"], FieldDef::new(FieldType::Number));
        assert!(user.fields["id"].primary_key);
        assert!(user.fields["email"].required);
        assert!(user.fields["email"].unique);

        let user_id = &schema.get("session").unwrap().fields["user_id"];
        let reference = user_id.references.as_ref().unwrap();
        assert_eq!(reference.table, "user");
        assert_eq!(reference.on_delete, OnDelete::SetNull);
    }

    #[test]
    fn test_field_type_display() {
        assert_eq!(FieldType::Date.to_string(), "date");
        assert_eq!(OnDelete::NoAction.as_sql(), "no action");
    }
}
