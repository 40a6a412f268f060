//! Grader error types.
//!
//! [`GraderError`] covers every failure mode of a grading attempt: missing
//! rows, transport failures against the grading model, unparseable model
//! output, and conflicting or failed database writes. Each stage of the
//! pipeline fails fast with one of these; nothing is retried within a single
//! attempt except bounded transport retries around the model call.

use sea_orm::{DbErr, TransactionError};
use thiserror::Error;

/// Represents all error types that can occur during a grading attempt.
#[derive(Debug, Error)]
pub enum GraderError {
    /// A referenced assignment, student, question, response or feedback row
    /// does not exist. Surfaced to clients as a 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// The external model call could not complete (network, auth, quota,
    /// timeout). The attempt aborts with nothing persisted.
    #[error("grading model call failed: {0}")]
    Gateway(String),

    /// The model reply could not be reduced to the required schema even
    /// after sanitization. Carries the raw text for operator diagnosis.
    #[error("could not parse model output: {message}")]
    Parse {
        message: String,
        /// The offending raw model output, retained for diagnostics.
        raw: String,
    },

    /// A concurrent write invalidated an expected row state; the whole
    /// attempt should be aborted and resubmitted, never patched partially.
    #[error("conflicting write detected: {0}")]
    Conflict(String),

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl GraderError {
    /// Builds a [`GraderError::Parse`] keeping the raw model output.
    pub fn parse(message: impl Into<String>, raw: impl Into<String>) -> Self {
        GraderError::Parse {
            message: message.into(),
            raw: raw.into(),
        }
    }
}

impl From<TransactionError<GraderError>> for GraderError {
    fn from(err: TransactionError<GraderError>) -> Self {
        match err {
            TransactionError::Connection(e) => GraderError::Database(e),
            TransactionError::Transaction(e) => e,
        }
    }
}
