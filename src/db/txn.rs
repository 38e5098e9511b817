//! Scoped transactions: all-or-nothing units of persistence work.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{debug, warn};

/// Run `work` inside one IMMEDIATE transaction.
///
/// - commit when `work` returns `Ok`
/// - roll back when it returns `Err` (domain rejections included)
/// - a panic or an abandoned caller drops the transaction, which rolls back
///
/// IMMEDIATE takes the store's write lock at BEGIN, so a read-check followed
/// by a write inside `work` cannot interleave with another session's write.
/// Errors leaving the scope are classified: store constraint violations
/// surface as `AppError::Conflict`.
pub fn scoped<T, F>(conn: &mut Connection, label: &str, work: F) -> AppResult<T>
where
    F: FnOnce(&Transaction<'_>) -> AppResult<T>,
{
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| AppError::from(e).classified())?;
    debug!(txn = label, "begin");

    match work(&tx) {
        Ok(value) => {
            tx.commit()
                .map_err(|e| AppError::from(e).classified())?;
            debug!(txn = label, "commit");
            Ok(value)
        }
        Err(err) => {
            if let Err(rb) = tx.rollback() {
                warn!(txn = label, error = %rb, "rollback failed");
            } else {
                warn!(txn = label, error = %err, "rolled back");
            }
            Err(err.classified())
        }
    }
}
