//! Connection provider for the projects store.
//!
//! # Responsibility
//! - Open one SQLite connection per logical operation from fixed configuration.
//! - Create the store and bootstrap its schema on explicit request.
//!
//! # Invariants
//! - `acquire` never creates a store; a missing file is a `ConnectionError`.
//! - Returned connections have `foreign_keys=ON`.
//! - Connections from `acquire` track generated keys for every store table.
//! - No busy handler is added beyond rusqlite's default timeout; a store that
//!   stays locked fails the statement.

use super::keys::track_generated_keys;
use super::schema::{apply_schema, TABLES};
use crate::config::StoreConfig;
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Store unreachable or unusable for the current operation.
#[derive(Debug)]
pub struct ConnectionError {
    target: String,
    source: rusqlite::Error,
}

impl ConnectionError {
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Display for ConnectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot connect to {}: {}", self.target, self.source)
    }
}

impl Error for ConnectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Opens connections against one configured store.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    config: StoreConfig,
}

impl ConnectionProvider {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Opens a connection to the existing store.
    ///
    /// The caller owns the connection for one logical operation; dropping it
    /// closes it.
    ///
    /// # Side effects
    /// - Emits `db_connect` logging events with target, duration and status.
    pub fn acquire(&self) -> Result<Connection, ConnectionError> {
        self.open(
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            |conn| track_generated_keys(conn, &TABLES),
        )
    }

    /// Creates the store if needed and applies the schema bootstrap.
    pub fn initialize(&self) -> Result<(), InitializeError> {
        std::fs::create_dir_all(self.config.data_dir()).map_err(InitializeError::DataDir)?;

        let conn = self.open(
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            |_| Ok(()),
        )?;
        apply_schema(&conn).map_err(InitializeError::Schema)?;

        info!(
            "event=db_initialize module=db status=ok target={}",
            self.config.target()
        );
        Ok(())
    }

    fn open(
        &self,
        flags: OpenFlags,
        prepare: impl FnOnce(&Connection) -> rusqlite::Result<()>,
    ) -> Result<Connection, ConnectionError> {
        let started_at = Instant::now();
        let target = self.config.target();
        info!("event=db_connect module=db status=start target={target}");

        let conn = match Connection::open_with_flags(self.config.database_path(), flags)
            .and_then(|conn| enable_foreign_keys(&conn).map(|()| conn))
            .and_then(|conn| prepare(&conn).map(|()| conn))
        {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_connect module=db status=error target={target} duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(ConnectionError {
                    target,
                    source: err,
                });
            }
        };

        info!(
            "event=db_connect module=db status=ok target={target} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(conn)
    }
}

fn enable_foreign_keys(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}

/// Failure while creating or bootstrapping the store.
#[derive(Debug)]
pub enum InitializeError {
    DataDir(std::io::Error),
    Connection(ConnectionError),
    Schema(super::DbError),
}

impl Display for InitializeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataDir(err) => write!(f, "cannot create store directory: {err}"),
            Self::Connection(err) => write!(f, "{err}"),
            Self::Schema(err) => write!(f, "schema bootstrap failed: {err}"),
        }
    }
}

impl Error for InitializeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DataDir(err) => Some(err),
            Self::Connection(err) => Some(err),
            Self::Schema(err) => Some(err),
        }
    }
}

impl From<ConnectionError> for InitializeError {
    fn from(value: ConnectionError) -> Self {
        Self::Connection(value)
    }
}
