//! Success / failure carrier returned by every externally callable operation.

use crate::errors::AppError;
use std::fmt;

/// Category of a refused operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// Input broke a domain rule.
    Validation,
    /// A uniqueness rule was violated (pre-checked or detected by the store).
    Conflict,
    /// The targeted record does not exist.
    NotFound,
    /// The caller lacks the privileged capability.
    Forbidden,
    /// Anything else: connectivity, disk, unexpected store errors.
    Failure,
}

impl RejectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionKind::Validation => "validation",
            RejectionKind::Conflict => "conflict",
            RejectionKind::NotFound => "not-found",
            RejectionKind::Forbidden => "forbidden",
            RejectionKind::Failure => "failure",
        }
    }
}

/// A refused operation with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub kind: RejectionKind,
    pub reason: String,
}

impl Rejection {
    pub fn new(kind: RejectionKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::new(RejectionKind::Validation, reason)
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::new(RejectionKind::Conflict, reason)
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::new(RejectionKind::NotFound, reason)
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::new(RejectionKind::Forbidden, reason)
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::new(RejectionKind::Failure, reason)
    }

    pub fn is(&self, kind: RejectionKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for Rejection {}

impl From<AppError> for Rejection {
    fn from(err: AppError) -> Self {
        match err.classified() {
            AppError::Rejected(r) => r,
            AppError::Validation(r) | AppError::InvalidTimestamp(r) | AppError::InvalidDate(r) => {
                Rejection::validation(r)
            }
            AppError::Conflict(r) => Rejection::conflict(r),
            AppError::NotFound(r) => Rejection::not_found(r),
            AppError::Forbidden(r) => Rejection::forbidden(r),
            other => Rejection::failure(other.to_string()),
        }
    }
}

/// Successful result with an optional confirmation for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted<T> {
    pub value: T,
    pub message: Option<String>,
}

impl<T> Accepted<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Accepted<()> {
    pub fn done() -> Self {
        Self::new(())
    }
}

pub type Outcome<T> = Result<Accepted<T>, Rejection>;
