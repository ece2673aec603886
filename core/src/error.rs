//! Error types for the todo service.
//!
//! # Design
//! Every failure a request can end in is a `TodoError` variant, and each
//! variant knows its HTTP status so the transport layer only translates.
//! `Store` wraps faults from the persistence backend; those are not part of
//! the client contract and surface as a generic 500.

use crate::store::StoreError;
use crate::types::Field;

/// Message for a lookup by id that finds nothing.
pub const TODO_NOT_FOUND: &str = "Todo with such id does not exist";
/// Message for list and delete-all on an empty collection.
pub const NO_TODO_FOUND: &str = "No Todo found";

/// Errors returned by `TodoService` operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// A required field is absent from the payload.
    #[error("{message}")]
    Missing { field: Field, message: String },

    /// A field is present but unacceptable.
    #[error("{message}")]
    Invalid { field: Field, message: String },

    /// No record matched, or the collection is empty.
    #[error("{0}")]
    NotFound(&'static str),

    /// An explicit id on create is already in use.
    #[error("Todo id {0} is already taken")]
    Conflict(i64),

    #[error("store failure: {0}")]
    Store(#[source] StoreError),
}

impl TodoError {
    pub fn missing(field: Field, message: impl Into<String>) -> Self {
        Self::Missing {
            field,
            message: message.into(),
        }
    }

    pub fn invalid(field: Field, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }

    /// HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Missing { .. } | Self::Invalid { .. } => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Store(_) => 500,
        }
    }

    /// The payload field a validation error is about.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::Missing { field, .. } | Self::Invalid { field, .. } => Some(*field),
            _ => None,
        }
    }
}

impl From<StoreError> for TodoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(id) => Self::Conflict(id),
            other => Self::Store(other),
        }
    }
}
