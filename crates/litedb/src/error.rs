//! Error types for litedb

use std::collections::BTreeMap;

use thiserror::Error;

/// Result type alias for litedb operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement preparation or execution error, propagated verbatim from
    /// the underlying engine
    #[error("Query error: {0}")]
    Query(#[from] rusqlite::Error),

    /// A binding whose placeholder does not appear in the prepared statement
    #[error("Unknown placeholder: {0}")]
    Binding(String),

    /// Operator outside the allowed set (strict mode only)
    #[error("Operator not allowed: {0}")]
    Operator(String),

    /// Model validation failure with per-field messages
    #[error("Validation failed for {model}")]
    Validation {
        model: String,
        errors: BTreeMap<String, Vec<String>>,
    },

    /// Language resource could not be loaded or parsed
    #[error("Language resource error: {0}")]
    Language(String),
}

impl DbError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a validation error for a model
    pub fn validation(
        model: impl Into<String>,
        errors: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self::Validation {
            model: model.into(),
            errors,
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// The per-field messages carried by a validation error
    pub fn validation_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}
