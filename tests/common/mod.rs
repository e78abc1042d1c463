//! Shared fixtures for the integration tests: an in-memory SQLite executor
//! and a small `tickets` table.

#![allow(dead_code)]

use awesome_sausage::{attach, Dialect, LifeError, LifeExecutor, ModelClass, Record, Sausage};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Executes rendered SQL against an in-memory SQLite database
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    pub fn in_memory() -> Self {
        let conn = Connection::open_in_memory().expect("open in-memory sqlite");
        Self { conn }
    }

    pub fn batch(&self, sql: &str) {
        self.conn.execute_batch(sql).expect("run setup batch");
    }
}

fn to_life_error(err: rusqlite::Error) -> LifeError {
    LifeError::QueryError(err.to_string())
}

fn column_value(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(i) => JsonValue::from(i),
        ValueRef::Real(f) => JsonValue::from(f),
        ValueRef::Text(t) => JsonValue::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => JsonValue::from(b.to_vec()),
    }
}

impl LifeExecutor for SqliteExecutor {
    fn execute(&self, query: &str) -> Result<u64, LifeError> {
        self.conn
            .execute(query, [])
            .map(|n| n as u64)
            .map_err(to_life_error)
    }

    fn query_all(&self, query: &str) -> Result<Vec<Record>, LifeError> {
        let mut stmt = self.conn.prepare(query).map_err(to_life_error)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let rows = stmt
            .query_map([], |row| {
                let mut record = Record::new();
                for (i, name) in names.iter().enumerate() {
                    record.insert(name.clone(), column_value(row.get_ref(i)?));
                }
                Ok(record)
            })
            .map_err(to_life_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(to_life_error)
    }
}

/// `tickets` with three rows: two open, one closed
pub fn seeded_tickets() -> SqliteExecutor {
    let db = SqliteExecutor::in_memory();
    db.batch(
        "CREATE TABLE tickets (
             id INTEGER PRIMARY KEY,
             status TEXT NOT NULL,
             priority INTEGER NOT NULL,
             hours REAL NOT NULL,
             billable REAL NOT NULL
         );
         INSERT INTO tickets (id, status, priority, hours, billable) VALUES
             (1, 'open', 1, 4.0, 2.0),
             (2, 'open', 3, 6.0, 3.0),
             (3, 'closed', 2, 10.0, 5.0);",
    );
    db
}

/// A decorated `Ticket` model pinned to SQLite
pub fn ticket_model() -> Arc<Sausage> {
    let class = ModelClass::subclass(&ModelClass::base(), "Ticket")
        .table("tickets")
        .columns(["id", "status", "priority", "hours", "billable"])
        .dialect(Dialect::Sqlite)
        .build();
    attach(&class).expect("attach Ticket");
    class.sausage().expect("Ticket is decorated")
}
