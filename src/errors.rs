//! Unified application error type.
//! All modules (db, core, cli, server) return AppError to keep the error
//! handling consistent and easy to manage.

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

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid inspection status: {0}")]
    InvalidStatus(String),

    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    // ---------------------------
    // Domain errors
    // ---------------------------
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Inspection {0} is closed and can no longer be modified")]
    InspectionClosed(String),

    #[error("Invalid status transition for inspection {so_number}: {from} -> {to}")]
    InvalidTransition {
        so_number: String,
        from: String,
        to: String,
    },

    // ---------------------------
    // Session errors
    // ---------------------------
    #[error("Invalid token: {0}")]
    Token(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Join several validation messages into one error.
    pub fn validation<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = messages
            .into_iter()
            .map(|m| m.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        AppError::Validation(joined)
    }

    /// True for errors caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidDate(_)
                | AppError::InvalidTime(_)
                | AppError::InvalidStatus(_)
                | AppError::InvalidPayload(_)
                | AppError::Validation(_)
                | AppError::Token(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
