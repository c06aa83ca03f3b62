//! Book and Publisher services.
//!
//! Each operation runs in exactly one unit of work: reads against a snapshot,
//! writes committed atomically after every invariant check passed. Storage
//! constraint violations that slip past a pre-check (a concurrent writer won
//! the race) are reported as the same domain error the pre-check would raise.

pub mod book;
pub mod publisher;

#[cfg(test)]
mod lost_races;

pub use book::BookService;
pub use publisher::PublisherService;

use crate::error::CoreError;
use crate::repository::{
    PublisherRepository, StoreError, BOOK_ISBN_CONSTRAINT, BOOK_PRICE_CHECK, BOOK_PUBLISHER_FK,
    PUBLISHER_NAME_CONSTRAINT,
};
use crate::types::DbId;

/// Translate a failed book write.
///
/// `isbn` is the value being written; `publisher_id` the link being written.
fn book_write_error(err: StoreError, isbn: &str, publisher_id: Option<DbId>) -> CoreError {
    match err {
        StoreError::UniqueViolation(ref constraint) if constraint == BOOK_ISBN_CONSTRAINT => {
            tracing::warn!(isbn, "Duplicate ISBN rejected by storage constraint");
            CoreError::IsbnDuplicate {
                isbn: isbn.to_string(),
            }
        }
        StoreError::ForeignKeyViolation(ref constraint) if constraint == BOOK_PUBLISHER_FK => {
            tracing::warn!(?publisher_id, "Publisher vanished before book write");
            CoreError::not_found(
                "Publisher",
                "id",
                publisher_id.map_or_else(|| "null".to_string(), |id| id.to_string()),
            )
        }
        StoreError::CheckViolation(ref constraint) if constraint == BOOK_PRICE_CHECK => {
            CoreError::Validation("price must be zero or greater".to_string())
        }
        other => other.into(),
    }
}

/// Translate a failed publisher write.
fn publisher_write_error(err: StoreError, name: &str) -> CoreError {
    match err {
        StoreError::UniqueViolation(ref constraint) if constraint == PUBLISHER_NAME_CONSTRAINT => {
            tracing::warn!(name, "Duplicate publisher name rejected by storage constraint");
            CoreError::PublisherNameDuplicate {
                name: name.to_string(),
            }
        }
        other => other.into(),
    }
}

/// Fail with the generic not-found error unless the publisher exists.
async fn ensure_publisher_exists<R>(repo: &mut R, id: DbId) -> Result<(), CoreError>
where
    R: PublisherRepository + ?Sized,
{
    if !repo.publisher_exists(id).await? {
        return Err(CoreError::not_found("Publisher", "id", id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn isbn_constraint_maps_to_duplicate() {
        let err = book_write_error(
            StoreError::UniqueViolation(BOOK_ISBN_CONSTRAINT.into()),
            "111",
            None,
        );
        assert_matches!(err, CoreError::IsbnDuplicate { isbn } if isbn == "111");
    }

    #[test]
    fn publisher_fk_maps_to_not_found() {
        let err = book_write_error(
            StoreError::ForeignKeyViolation(BOOK_PUBLISHER_FK.into()),
            "111",
            Some(9),
        );
        assert_matches!(
            err,
            CoreError::NotFound { entity: "Publisher", value, .. } if value == "9"
        );
    }

    #[test]
    fn price_check_maps_to_validation() {
        let err = book_write_error(
            StoreError::CheckViolation(BOOK_PRICE_CHECK.into()),
            "111",
            None,
        );
        assert_matches!(err, CoreError::Validation(msg) if msg.starts_with("price"));
    }

    #[test]
    fn unknown_constraint_is_internal() {
        let err = book_write_error(
            StoreError::UniqueViolation("uq_something_else".into()),
            "111",
            None,
        );
        assert_matches!(err, CoreError::Internal(_));
    }

    #[test]
    fn name_constraint_maps_to_duplicate() {
        let err = publisher_write_error(
            StoreError::UniqueViolation(PUBLISHER_NAME_CONSTRAINT.into()),
            "Acme",
        );
        assert_matches!(err, CoreError::PublisherNameDuplicate { name } if name == "Acme");
    }
}
