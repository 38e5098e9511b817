//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError so that store failures,
//! domain rejections and I/O problems travel through one channel.

use crate::core::outcome::Rejection;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp (expected YYYY-MM-DD HH:MM:SS): {0}")]
    InvalidTimestamp(String),

    // ---------------------------
    // Domain errors
    // ---------------------------
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Rejected(#[from] Rejection),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Import / export errors
    // ---------------------------
    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Re-shape a store constraint violation into a `Conflict`.
    ///
    /// Pre-checked conflicts and conflicts detected by the store itself
    /// (a concurrent session won the race) must look the same to callers.
    pub fn classified(self) -> AppError {
        match self {
            AppError::Db(ref e) if is_constraint_violation(e) => {
                AppError::Conflict(describe_constraint(e))
            }
            other => other,
        }
    }
}

/// True when SQLite refused a write because of a UNIQUE/CHECK/FK constraint.
pub fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn describe_constraint(e: &rusqlite::Error) -> String {
    let detail = match e {
        rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.as_str(),
        _ => "",
    };

    if detail.contains("equipment.tag") {
        "Uniqueness violated: asset tag already assigned to another item.".to_string()
    } else if detail.contains("rooms.code") {
        "Uniqueness violated: room code already registered.".to_string()
    } else if detail.contains("FOREIGN KEY") {
        "Integrity violated: referenced equipment does not exist.".to_string()
    } else if detail.is_empty() {
        "Integrity constraint violated.".to_string()
    } else {
        format!("Integrity constraint violated ({detail}).")
    }
}
