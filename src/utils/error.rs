use crate::domain::validation::ValidationErrors;
use thiserror::Error;

/// Failures raised by an [`AccountingStore`](crate::domain::ports::AccountingStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Network failure, timeout, or an undecodable response body.
    #[error("ledger request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("ledger returned code: {status}, resp: {body}")]
    Remote { status: u16, body: String },

    /// The backend does not implement the operation. Reaching this is a bug in the caller.
    #[error("operation '{operation}' is not supported by this store")]
    Unsupported { operation: &'static str },

    #[error("no accounting info with id '{id}'")]
    NotFound { id: String },
}

impl StoreError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::Unsupported { .. })
    }
}

#[derive(Error, Debug)]
pub enum AccountingError {
    #[error("invalid request payload: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, AccountingError>;
pub type StoreResult<T> = std::result::Result<T, StoreError>;
