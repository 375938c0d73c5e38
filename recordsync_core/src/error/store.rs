//! Store related error types

use thiserror::Error;

/// Primary store `create` failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreateError {
    /// The store refused the record (field validation, permissions)
    #[error("Create rejected: {message}")]
    Rejected { message: String },

    /// The store could not be reached
    #[error("Primary store unavailable: {message}")]
    Unavailable { message: String },

    /// Generic create failure
    #[error("Create failed: {message}")]
    Other { message: String },
}

impl CreateError {
    /// Create a rejected error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a generic create error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Secondary store `find` failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The store could not be reached
    #[error("Secondary store unavailable: {message}")]
    Unavailable { message: String },

    /// A record carried an entity tag outside Contact/Account/Case
    #[error("Unrecognized entity kind '{tag}'")]
    UnrecognizedKind { tag: String },

    /// Generic lookup failure
    #[error("Lookup failed: {message}")]
    Other { message: String },
}

impl LookupError {
    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create an unrecognized entity kind error
    pub fn unrecognized_kind(tag: impl Into<String>) -> Self {
        Self::UnrecognizedKind { tag: tag.into() }
    }

    /// Create a generic lookup error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Secondary store `batch_write` failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// The store refused the batch
    #[error("Write rejected: {message}")]
    Rejected { message: String },

    /// The store could not be reached
    #[error("Secondary store unavailable: {message}")]
    Unavailable { message: String },

    /// Generic write failure
    #[error("Write failed: {message}")]
    Other { message: String },
}

impl WriteError {
    /// Create a rejected error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a generic write error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}
