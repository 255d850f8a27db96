// File: src/error.rs
// Purpose: Caller-contract errors for the validation engine

use thiserror::Error;

/// Misuse of the engine by the page, never shown to the end user
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidatorError {
    #[error("no form with id '{0}' in the document")]
    FormNotFound(String),

    #[error("form '{0}' has not been bound for validation")]
    NotBound(String),

    #[error("invalid validation options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, ValidatorError>;
