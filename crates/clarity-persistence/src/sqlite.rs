//! SQLite-backed [`PersistenceSink`].

use std::path::Path;

use clarity_model::{CellValue, DatasetTypeSpec, NormalizedTable, Subject};
use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};
use tracing::{debug, info};

use crate::error::{Result, SinkError};
use crate::schema::{SUBJECTS_TABLE, bootstrap_statements, quote_ident};
use crate::sink::PersistenceSink;

/// A single SQLite connection with foreign keys enforced.
///
/// Outside [`append_rows`](PersistenceSink::append_rows) the connection is
/// in autocommit mode, so each subject insert is committed on its own.
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Opens (or creates) a database file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(SinkError::Open)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(SinkError::Open)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(SinkError::Open)?;
        Ok(Self { conn })
    }

    /// Creates the subject table and one fact table per destination.
    pub fn apply_bootstrap_schema(&mut self, specs: &[DatasetTypeSpec]) -> Result<usize> {
        let statements = bootstrap_statements(specs);
        let tx = self
            .conn
            .transaction()
            .map_err(|e| SinkError::from_sqlite(SUBJECTS_TABLE, e))?;
        for statement in &statements {
            tx.execute_batch(statement)
                .map_err(|e| SinkError::from_sqlite(SUBJECTS_TABLE, e))?;
        }
        tx.commit()
            .map_err(|e| SinkError::from_sqlite(SUBJECTS_TABLE, e))?;
        info!(tables = statements.len(), "applied bootstrap schema");
        Ok(statements.len())
    }

    /// Underlying connection, for queries outside the sink contract.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn to_sql_value(cell: &CellValue) -> Value {
    match cell {
        CellValue::Empty | CellValue::Error(_) => Value::Null,
        CellValue::Float(v) if v.is_nan() => Value::Null,
        CellValue::Float(v) => Value::Real(*v),
        CellValue::Int(v) => Value::Integer(*v),
        CellValue::Bool(v) => Value::Integer(i64::from(*v)),
        CellValue::Text(s) | CellValue::DateTime(s) => Value::Text(s.clone()),
    }
}

fn insert_sql(table: &str, columns: &[String]) -> String {
    let names: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names.join(", "),
        placeholders.join(", ")
    )
}

impl PersistenceSink for SqliteSink {
    fn append_rows(&mut self, table: &NormalizedTable) -> Result<usize> {
        if table.columns.is_empty() || table.is_empty() {
            return Ok(0);
        }
        let name = table.table.as_str();
        let sql = insert_sql(name, &table.columns);

        let tx = self
            .conn
            .transaction()
            .map_err(|e| SinkError::from_sqlite(name, e))?;
        {
            let mut stmt = tx
                .prepare(&sql)
                .map_err(|e| SinkError::from_sqlite(name, e))?;
            for row in &table.rows {
                let values = table.columns.iter().map(|c| to_sql_value(row.get(c)));
                stmt.execute(params_from_iter(values))
                    .map_err(|e| SinkError::from_sqlite(name, e))?;
            }
        }
        tx.commit().map_err(|e| SinkError::from_sqlite(name, e))?;

        debug!(table = name, rows = table.len(), "appended rows");
        Ok(table.len())
    }

    fn insert_subject_if_absent(&mut self, subject: &Subject) -> Result<bool> {
        let sql = format!(
            "INSERT INTO {SUBJECTS_TABLE} (subject_id, site_id, study_name) \
             VALUES (?1, ?2, ?3) ON CONFLICT (subject_id) DO NOTHING"
        );
        let changed = self
            .conn
            .execute(
                &sql,
                params![subject.subject_id, subject.site_id, subject.study_name],
            )
            .map_err(|e| SinkError::from_sqlite(SUBJECTS_TABLE, e))?;
        Ok(changed > 0)
    }

    fn table_columns(&mut self, table: &str) -> Result<Vec<String>> {
        let sql = format!("PRAGMA table_info({})", quote_ident(table));
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| SinkError::from_sqlite(table, e))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .map_err(|e| SinkError::from_sqlite(table, e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| SinkError::from_sqlite(table, e))?;
        Ok(names)
    }
}
