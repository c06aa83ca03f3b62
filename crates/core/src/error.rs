use crate::repository::StoreError;
use crate::types::DbId;

/// Result classification of a [`CoreError`].
///
/// The HTTP boundary maps each kind to a status code; the core itself never
/// deals in status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found with {field}: {value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Book already exists with ISBN: {isbn}")]
    IsbnDuplicate { isbn: String },

    #[error("Publisher already exists with name: {name}")]
    PublisherNameDuplicate { name: String },

    #[error("Cannot delete publisher with id: {id}. It has {book_count} books")]
    PublisherHasBooks { id: DbId, book_count: i64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias used by every service operation.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Build the generic not-found error for a lookup of `entity` by `field`.
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Stable machine-readable code, surfaced to clients next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::NotFound { .. } => "RESOURCE_NOT_FOUND",
            CoreError::IsbnDuplicate { .. } => "ISBN_DUPLICATE",
            CoreError::PublisherNameDuplicate { .. } => "PUBLISHER_NAME_DUPLICATE",
            CoreError::PublisherHasBooks { .. } => "PUBLISHER_HAS_BOOKS",
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::IsbnDuplicate { .. }
            | CoreError::PublisherNameDuplicate { .. }
            | CoreError::PublisherHasBooks { .. } => ErrorKind::Conflict,
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Store failures that a service did not translate into a domain error are
/// internal: a constraint the service should have pre-checked, or a backend
/// outage.
impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::Internal(err.to_string())
    }
}
