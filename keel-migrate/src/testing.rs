//! In-memory fakes for the engine's ports.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapter::NativeTarget;
use crate::diff::{SchemaDiff, TableDiff};
use crate::error::{MigrateResult, MigrationError};
use crate::gate::Confirm;
use crate::report::Reporter;
use crate::runner::{CommandRunner, CommandStatus};
use crate::schema::{LiveSchema, Schema, TableSchema};
use crate::store::{SchemaStore, StoreConnector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Introspect,
    CreateTable(String),
    AddFields(String),
}

/// Shared record of store calls, readable after the store is consumed.
#[derive(Debug, Clone, Default)]
pub struct StoreLog(Arc<Mutex<Vec<StoreCall>>>);

impl StoreLog {
    pub fn calls(&self) -> Vec<StoreCall> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, call: StoreCall) {
        self.0.lock().unwrap().push(call);
    }
}

/// Reflect a diff onto a schema, as a successful apply would.
///
/// Existing tables are matched ignoring ASCII case, like SQLite does.
pub fn apply_diff(diff: &SchemaDiff, schema: &mut Schema) {
    for created in &diff.to_be_created {
        let mut table = TableSchema::new();
        table.fields.extend(created.fields.clone());
        schema.insert_table(created.table.clone(), table);
    }
    for added in &diff.to_be_added {
        let existing = schema
            .tables()
            .map(|(name, _)| name.to_string())
            .find(|name| name.eq_ignore_ascii_case(&added.table))
            .unwrap_or_else(|| added.table.clone());
        let mut table = schema.get(&existing).cloned().unwrap_or_default();
        table.fields.extend(added.fields.clone());
        schema.insert_table(existing, table);
    }
}

#[derive(Debug)]
pub struct FakeStore {
    live: Arc<Mutex<Schema>>,
    log: StoreLog,
    fail_on: Option<String>,
    warnings: Vec<(String, String)>,
}

impl FakeStore {
    pub fn new(live: Schema) -> Self {
        Self {
            live: Arc::new(Mutex::new(live)),
            log: StoreLog::default(),
            fail_on: None,
            warnings: Vec::new(),
        }
    }

    pub fn fail_on(mut self, table: &str) -> Self {
        self.fail_on = Some(table.to_string());
        self
    }

    pub fn warn_on(mut self, table: &str, warning: &str) -> Self {
        self.warnings.push((table.to_string(), warning.to_string()));
        self
    }

    pub fn log(&self) -> StoreLog {
        self.log.clone()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.log.calls()
    }

    pub fn live(&self) -> Schema {
        self.live.lock().unwrap().clone()
    }

    fn mutate(&self, table: &TableDiff, created: bool) -> MigrateResult<Vec<String>> {
        if self.fail_on.as_deref() == Some(table.table.as_str()) {
            return Err(MigrationError::database(format!(
                "cannot migrate table {}",
                table.table
            )));
        }

        let diff = if created {
            SchemaDiff {
                to_be_created: vec![table.clone()],
                to_be_added: Vec::new(),
            }
        } else {
            SchemaDiff {
                to_be_created: Vec::new(),
                to_be_added: vec![table.clone()],
            }
        };
        apply_diff(&diff, &mut self.live.lock().unwrap());

        Ok(self
            .warnings
            .iter()
            .filter(|(t, _)| *t == table.table)
            .map(|(_, w)| w.clone())
            .collect())
    }
}

#[async_trait::async_trait]
impl SchemaStore for FakeStore {
    async fn introspect(&self) -> MigrateResult<LiveSchema> {
        self.log.push(StoreCall::Introspect);
        Ok(self.live())
    }

    async fn create_table(&mut self, table: &TableDiff) -> MigrateResult<Vec<String>> {
        self.log.push(StoreCall::CreateTable(table.table.clone()));
        self.mutate(table, true)
    }

    async fn add_fields(&mut self, table: &TableDiff) -> MigrateResult<Vec<String>> {
        self.log.push(StoreCall::AddFields(table.table.clone()));
        self.mutate(table, false)
    }
}

/// Hands out stores sharing one live schema and one call log.
pub struct FakeConnector {
    live: Arc<Mutex<Schema>>,
    log: StoreLog,
    reachable: bool,
}

impl FakeConnector {
    pub fn new(live: Schema) -> Self {
        Self {
            live: Arc::new(Mutex::new(live)),
            log: StoreLog::default(),
            reachable: true,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new(Schema::new())
        }
    }

    pub fn log(&self) -> StoreLog {
        self.log.clone()
    }
}

#[async_trait::async_trait]
impl StoreConnector for FakeConnector {
    type Store = FakeStore;

    async fn connect(&self, target: &NativeTarget) -> MigrateResult<FakeStore> {
        if !self.reachable {
            return Err(MigrationError::database(format!(
                "unable to open database file: {}",
                target.url
            )));
        }
        Ok(FakeStore {
            live: Arc::clone(&self.live),
            log: self.log.clone(),
            fail_on: None,
            warnings: Vec::new(),
        })
    }
}

pub struct FakeConfirm {
    answer: bool,
    pub questions: Vec<String>,
}

impl FakeConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            questions: Vec::new(),
        }
    }
}

impl Confirm for FakeConfirm {
    fn ask(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.answer
    }
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub started: Vec<String>,
    pub stops: usize,
    pub infos: Vec<String>,
    pub warnings: Vec<String>,
    pub tables: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn start(&mut self, message: &str) {
        self.started.push(message.to_string());
    }

    fn stop(&mut self) {
        self.stops += 1;
    }

    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn table_change(&mut self, table: &TableDiff) {
        self.tables.push(table.table.clone());
    }
}

pub struct FakeRunner {
    status: Option<CommandStatus>,
    invocations: Mutex<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn exiting(status: CommandStatus) -> Self {
        Self {
            status: Some(status),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn unspawnable() -> Self {
        Self {
            status: None,
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[&str], _cwd: &Path) -> MigrateResult<CommandStatus> {
        let mut invocation = vec![program.to_string()];
        invocation.extend(args.iter().map(|a| a.to_string()));
        self.invocations.lock().unwrap().push(invocation);

        self.status
            .ok_or_else(|| MigrationError::command(format!("failed to run `{}`", program)))
    }
}
