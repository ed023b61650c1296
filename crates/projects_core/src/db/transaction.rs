//! Unit-of-work control over one connection.
//!
//! # Responsibility
//! - Begin, commit and roll back explicit transactions.
//! - Run a unit of work with commit-on-success and rollback-on-any-failure.
//!
//! # Invariants
//! - Auto-commit is off between `begin` and `commit`/`rollback`, and restored
//!   after either.
//! - `rollback` never fails; its own errors are logged so the original cause
//!   reaches the caller.
//! - A transaction dropped without `commit` rolls back.

use crate::db::DbResult;
use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Disables auto-commit on `conn` until the returned transaction finishes.
pub fn begin(conn: &Connection) -> DbResult<Transaction<'_>> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Deferred)?;
    debug!("event=tx_begin module=db status=ok");
    Ok(tx)
}

/// Makes every statement since `begin` durable.
pub fn commit(tx: Transaction<'_>) -> DbResult<()> {
    tx.commit()?;
    debug!("event=tx_commit module=db status=ok");
    Ok(())
}

/// Discards every statement since `begin`.
pub fn rollback(tx: Transaction<'_>) {
    match tx.rollback() {
        Ok(()) => debug!("event=tx_rollback module=db status=ok"),
        Err(err) => warn!("event=tx_rollback_failed module=db status=error error={err}"),
    }
}

/// Runs `work` inside one transaction on `conn`.
///
/// Commits when `work` succeeds; otherwise rolls back and returns the
/// original error unchanged.
pub fn in_transaction<T, F>(conn: &Connection, operation: &'static str, work: F) -> DbResult<T>
where
    F: FnOnce(&Transaction<'_>) -> DbResult<T>,
{
    let tx = begin(conn)?;
    match work(&tx) {
        Ok(value) => {
            commit(tx)?;
            Ok(value)
        }
        Err(err) => {
            debug!("event=tx_abort module=db status=error operation={operation} error={err}");
            rollback(tx);
            Err(err)
        }
    }
}
