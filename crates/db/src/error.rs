//! Classification of sqlx errors into store errors.

use bookshelf_core::repository::StoreError;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL SQLSTATE for `check_violation`.
const CHECK_VIOLATION: &str = "23514";

/// Turn a driver error into a [`StoreError`].
///
/// - Unique violations keep the violated constraint name.
/// - Foreign key violations keep the violated constraint name.
/// - Check violations keep the violated constraint name.
/// - Everything else is logged and reported as a backend error.
pub fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown").to_string();
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return StoreError::UniqueViolation(constraint),
            Some(FOREIGN_KEY_VIOLATION) => return StoreError::ForeignKeyViolation(constraint),
            Some(CHECK_VIOLATION) => return StoreError::CheckViolation(constraint),
            _ => {}
        }
    }
    tracing::error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}
