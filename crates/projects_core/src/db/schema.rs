//! Schema bootstrap for the projects store.
//!
//! # Responsibility
//! - Create the five projects tables when a store is first initialized.
//! - Refuse stores written by a newer schema.
//!
//! # Invariants
//! - Bootstrap is idempotent; every statement is `IF NOT EXISTS`.
//! - The applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

pub const PROJECT_TABLE: &str = "project";
pub const MATERIAL_TABLE: &str = "material";
pub const STEP_TABLE: &str = "step";
pub const CATEGORY_TABLE: &str = "category";
pub const PROJECT_CATEGORY_TABLE: &str = "project_category";

pub const TABLES: [&str; 5] = [
    PROJECT_TABLE,
    MATERIAL_TABLE,
    STEP_TABLE,
    CATEGORY_TABLE,
    PROJECT_CATEGORY_TABLE,
];

const SCHEMA_VERSION: u32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Returns the schema version written by this binary.
pub fn schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Creates missing tables and stamps the schema version.
pub fn apply_schema(conn: &Connection) -> DbResult<()> {
    let current = current_user_version(conn)?;
    if current > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: SCHEMA_VERSION,
        });
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
