//! Generated-key lookup after inserts.
//!
//! # Responsibility
//! - Record, per connection, which table received the latest insert.
//! - Resolve the key generated by that insert for the table the caller names.
//!
//! # Invariants
//! - Must run on the inserting connection, inside the inserting transaction,
//!   before any other insert on that connection.
//! - Every table that is looked up must have been passed to
//!   `track_generated_keys` on that connection.
//! - Tracking lives in the `temp` schema; it dies with the connection and is
//!   rolled back with the statement or transaction that wrote it.

use crate::db::{DbError, DbResult};
use rusqlite::{Connection, OptionalExtension};

/// Installs per-connection insert tracking for `tables`.
///
/// Idempotent. Fails when a table does not exist in the `main` schema.
pub fn track_generated_keys(conn: &Connection, tables: &[&str]) -> rusqlite::Result<()> {
    let mut sql = String::from(
        "CREATE TEMP TABLE IF NOT EXISTS last_generated_key (
            slot INTEGER PRIMARY KEY CHECK (slot = 0),
            table_name TEXT NOT NULL,
            row_id INTEGER NOT NULL
        );",
    );
    for table in tables {
        sql.push_str(&format!(
            "CREATE TEMP TRIGGER IF NOT EXISTS track_key_{table}
             AFTER INSERT ON main.{table}
             BEGIN
                INSERT OR REPLACE INTO last_generated_key (slot, table_name, row_id)
                VALUES (0, '{table}', NEW.rowid);
             END;"
        ));
    }
    conn.execute_batch(&sql)
}

/// Returns the key the store generated for the last insert into `table`.
///
/// Fails with `GeneratedKeyNotFound` when this connection has not inserted
/// anything, or when its latest insert went into another table.
pub fn last_insert_id(conn: &Connection, table: &'static str) -> DbResult<i64> {
    let rowid = conn.last_insert_rowid();
    if rowid == 0 {
        return Err(DbError::GeneratedKeyNotFound { table });
    }

    let tracked: Option<(String, i64)> = conn
        .query_row(
            "SELECT table_name, row_id FROM temp.last_generated_key WHERE slot = 0;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match tracked {
        Some((table_name, row_id)) if table_name == table && row_id == rowid => Ok(rowid),
        _ => Err(DbError::GeneratedKeyNotFound { table }),
    }
}
