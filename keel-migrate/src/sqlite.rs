//! Native SQLite store.

use std::path::{Path, PathBuf};

use tokio_rusqlite::Connection;
use tracing::{debug, warn};

use crate::adapter::{Dialect, NativeTarget};
use crate::diff::TableDiff;
use crate::error::{MigrateResult, MigrationError};
use crate::schema::{FieldDef, LiveSchema, TableSchema};
use crate::sql::{SqlBatch, SqliteSqlGenerator, field_type_from_sql, quote_ident};
use crate::store::{SchemaStore, StoreConnector};

/// In-memory database marker.
pub const MEMORY: &str = ":memory:";

/// A column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone)]
struct ColumnRow {
    name: String,
    declared_type: String,
    not_null: bool,
    primary_key: bool,
}

/// A SQLite database migrated directly by the engine.
pub struct SqliteStore {
    conn: Connection,
    generator: SqliteSqlGenerator,
}

impl SqliteStore {
    /// Open (or create) a database file.
    pub async fn open(path: impl AsRef<Path>) -> MigrateResult<Self> {
        let path = path.as_ref().to_path_buf();
        debug!(path = %path.display(), "Opening SQLite database");
        let conn = Connection::open(path).await?;
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory database.
    pub async fn open_in_memory() -> MigrateResult<Self> {
        let conn = Connection::open_in_memory().await?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            generator: SqliteSqlGenerator,
        }
    }

    async fn execute(&self, batch: SqlBatch) -> MigrateResult<Vec<String>> {
        for warning in &batch.warnings {
            warn!("{}", warning);
        }
        if batch.is_empty() {
            return Ok(batch.warnings);
        }

        let sql = batch.to_sql();
        debug!(sql = %sql, "Executing DDL");
        self.conn
            .call(move |conn| Ok(conn.execute_batch(&sql)?))
            .await
            .map_err(MigrationError::from)?;

        Ok(batch.warnings)
    }
}

#[async_trait::async_trait]
impl SchemaStore for SqliteStore {
    async fn introspect(&self) -> MigrateResult<LiveSchema> {
        let tables = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master \
                     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
                     ORDER BY rowid",
                )?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, rusqlite::Error>>()?;

                let mut tables = Vec::with_capacity(names.len());
                for name in names {
                    let mut info =
                        conn.prepare(&format!("PRAGMA table_info({})", quote_ident(&name)))?;
                    let columns = info
                        .query_map([], |row| {
                            Ok(ColumnRow {
                                name: row.get(1)?,
                                declared_type: row.get(2)?,
                                not_null: row.get::<_, i64>(3)? != 0,
                                primary_key: row.get::<_, i64>(5)? != 0,
                            })
                        })?
                        .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                    tables.push((name, columns));
                }
                Ok(tables)
            })
            .await?;

        let mut schema = LiveSchema::new();
        for (name, columns) in tables {
            let table = columns.into_iter().fold(TableSchema::new(), |table, col| {
                let mut def = FieldDef::new(field_type_from_sql(&col.declared_type));
                def.required = col.not_null;
                def.primary_key = col.primary_key;
                table.field(col.name, def)
            });
            schema.insert_table(name, table);
        }

        debug!(tables = schema.len(), "Introspected SQLite schema");
        Ok(schema)
    }

    async fn create_table(&mut self, table: &TableDiff) -> MigrateResult<Vec<String>> {
        let batch = self.generator.create_table(table);
        self.execute(batch).await
    }

    async fn add_fields(&mut self, table: &TableDiff) -> MigrateResult<Vec<String>> {
        let batch = self.generator.add_columns(table);
        self.execute(batch).await
    }
}

/// Opens SQLite stores, resolving relative paths against a working directory.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    working_dir: PathBuf,
}

impl SqliteConnector {
    /// Create a connector rooted at `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Resolve the configured URL to a database path, or `None` for in-memory.
    pub fn database_path(&self, url: &str) -> Option<PathBuf> {
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .or_else(|| url.strip_prefix("file:"))
            .unwrap_or(url);

        if path == MEMORY {
            return None;
        }

        let path = Path::new(path);
        if path.is_absolute() {
            Some(path.to_path_buf())
        } else {
            Some(self.working_dir.join(path))
        }
    }
}

#[async_trait::async_trait]
impl StoreConnector for SqliteConnector {
    type Store = SqliteStore;

    async fn connect(&self, target: &NativeTarget) -> MigrateResult<SqliteStore> {
        match target.dialect {
            Dialect::Sqlite => match self.database_path(&target.url) {
                Some(path) => SqliteStore::open(path).await,
                None => SqliteStore::open_in_memory().await,
            },
        }
    }
}
