//! SQLite data-access core.
//!
//! # Responsibility
//! - Acquire one connection per logical operation.
//! - Scope statements inside explicit transactions.
//! - Bind typed parameters and extract typed rows without per-entity SQL glue.
//! - Resolve store-generated keys after inserts.
//!
//! # Invariants
//! - Every failure inside a transaction is followed by a rollback.
//! - Connections, statements and cursors are released on scope exit.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod binder;
pub mod connection;
pub mod extract;
pub mod keys;
pub mod schema;
pub mod statement;
pub mod transaction;

pub use binder::{bind, bind_all, BindError, Binding, ParamType, ParamValue};
pub use connection::{ConnectionError, ConnectionProvider, InitializeError};
pub use extract::{columns_for, extract, ExtractedRow, ExtractionError, Field, FieldType, RowShape};
pub use keys::{last_insert_id, track_generated_keys};
pub use transaction::{begin, commit, in_transaction, rollback};

pub type DbResult<T> = Result<T, DbError>;

/// Statement-level failure inside a unit of work.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Bind(BindError),
    Extraction(ExtractionError),
    /// No generated key is available for the table on this connection.
    GeneratedKeyNotFound {
        table: &'static str,
    },
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Bind(err) => write!(f, "{err}"),
            Self::Extraction(err) => write!(f, "{err}"),
            Self::GeneratedKeyNotFound { table } => {
                write!(f, "no generated key available for table `{table}`")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Bind(err) => Some(err),
            Self::Extraction(err) => Some(err),
            Self::GeneratedKeyNotFound { .. } => None,
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<BindError> for DbError {
    fn from(value: BindError) -> Self {
        Self::Bind(value)
    }
}

impl From<ExtractionError> for DbError {
    fn from(value: ExtractionError) -> Self {
        Self::Extraction(value)
    }
}
