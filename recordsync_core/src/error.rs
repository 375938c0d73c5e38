//! Error types for the record sync core library
//!
//! Errors are grouped by the store operation that raised them. Every store
//! error is terminal for that operation: nothing here is retried and no prior
//! step is rolled back.

use thiserror::Error;

pub mod store;
pub mod validation;

pub use self::store::{CreateError, LookupError, WriteError};
pub use self::validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the record sync core library
///
/// Errors are categorized into four main types:
/// - Create errors: the primary store refused or could not create a record
/// - Lookup errors: a secondary store `find` failed
/// - Write errors: the secondary store write-back failed
/// - Validation errors: malformed parameters, fixtures or configuration
#[derive(Error, Debug)]
pub enum Error {
    /// Primary store create failure
    #[error(transparent)]
    Create(#[from] CreateError),

    /// Secondary store lookup failure
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Secondary store write-back failure
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Input validation failure
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(ValidationError::invalid_parameter(
            "json",
            &err.to_string(),
        ))
    }
}
