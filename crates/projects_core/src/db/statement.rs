//! Prepared-statement helpers over the binder and extractor.
//!
//! Statements and cursors live only for the duration of one call.

use crate::db::binder::{bind_all, Binding};
use crate::db::extract::{extract, RowShape};
use crate::db::DbResult;
use rusqlite::Connection;

/// Prepares `sql`, binds `bindings` and returns the affected row count.
pub fn execute(conn: &Connection, sql: &str, bindings: &[Binding]) -> DbResult<usize> {
    let mut stmt = conn.prepare(sql)?;
    bind_all(&mut stmt, bindings)?;
    Ok(stmt.raw_execute()?)
}

/// Prepares `sql`, binds `bindings` and extracts every row as `S`.
pub fn query_all<S: RowShape>(
    conn: &Connection,
    sql: &str,
    bindings: &[Binding],
) -> DbResult<Vec<S>> {
    let mut stmt = conn.prepare(sql)?;
    bind_all(&mut stmt, bindings)?;

    let mut rows = stmt.raw_query();
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(extract::<S>(row)?);
    }
    Ok(items)
}

/// Like `query_all`, keeping at most the first row.
pub fn query_optional<S: RowShape>(
    conn: &Connection,
    sql: &str,
    bindings: &[Binding],
) -> DbResult<Option<S>> {
    let mut stmt = conn.prepare(sql)?;
    bind_all(&mut stmt, bindings)?;

    let mut rows = stmt.raw_query();
    let item = match rows.next()? {
        Some(row) => Some(extract::<S>(row)?),
        None => None,
    };
    Ok(item)
}
