use crate::errors::AppResult;
use crate::utils::date::{format_timestamp, now};
use rusqlite::{Connection, Result, Row, params};
use serde::Serialize;
use tracing::warn;

/// One row of the internal audit log.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

fn map_row(row: &Row) -> Result<LogEntry> {
    Ok(LogEntry {
        id: row.get("id")?,
        date: row.get("date")?,
        operation: row.get("operation")?,
        target: row.get::<_, Option<String>>("target")?.unwrap_or_default(),
        message: row.get("message")?,
    })
}

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![format_timestamp(&now()), operation, target, message])?;

    Ok(())
}

/// Audit a mutation that has already been committed.
/// A failing audit write is reported but never undoes the business operation.
pub fn audit(conn: &Connection, operation: &str, target: &str, message: &str) {
    if let Err(e) = ttlog(conn, operation, target, message) {
        warn!(operation, target, error = %e, "audit log write failed");
    }
}

pub fn list_log(conn: &Connection) -> AppResult<Vec<LogEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
