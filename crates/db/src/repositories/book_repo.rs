//! Repository for the `books` table.

use bookshelf_core::book::NewBook;
use bookshelf_core::types::DbId;
use sqlx::PgConnection;

use crate::models::book::BookRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, author, isbn, price, publish_date, publisher_id, created_at, updated_at";

/// Provides CRUD and lookup queries for books.
pub struct BookRepo;

impl BookRepo {
    /// Insert a new book, returning the created row.
    pub async fn create(conn: &mut PgConnection, input: &NewBook) -> Result<BookRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO books (title, author, isbn, price, publish_date, publisher_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookRow>(&query)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.isbn)
            .bind(input.price)
            .bind(input.publish_date)
            .bind(input.publisher_id)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<BookRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, BookRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Fetch a book and lock its row until the transaction ends.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<BookRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, BookRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn find_by_isbn(
        conn: &mut PgConnection,
        isbn: &str,
    ) -> Result<Option<BookRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE isbn = $1");
        sqlx::query_as::<_, BookRow>(&query)
            .bind(isbn)
            .fetch_optional(conn)
            .await
    }

    /// List all books in insertion order.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<BookRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books ORDER BY id ASC");
        sqlx::query_as::<_, BookRow>(&query).fetch_all(conn).await
    }

    /// Case-insensitive substring match on `author`.
    ///
    /// Uses `strpos` rather than `ILIKE` so `%` and `_` in the input match
    /// literally.
    pub async fn search_by_author(
        conn: &mut PgConnection,
        fragment: &str,
    ) -> Result<Vec<BookRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM books
             WHERE strpos(lower(author), lower($1)) > 0
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, BookRow>(&query)
            .bind(fragment)
            .fetch_all(conn)
            .await
    }

    /// Case-insensitive substring match on `title`.
    pub async fn search_by_title(
        conn: &mut PgConnection,
        fragment: &str,
    ) -> Result<Vec<BookRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM books
             WHERE strpos(lower(title), lower($1)) > 0
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, BookRow>(&query)
            .bind(fragment)
            .fetch_all(conn)
            .await
    }

    pub async fn list_by_publisher(
        conn: &mut PgConnection,
        publisher_id: DbId,
    ) -> Result<Vec<BookRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM books
             WHERE publisher_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, BookRow>(&query)
            .bind(publisher_id)
            .fetch_all(conn)
            .await
    }

    pub async fn count_by_publisher(
        conn: &mut PgConnection,
        publisher_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books WHERE publisher_id = $1")
            .bind(publisher_id)
            .fetch_one(conn)
            .await
    }

    pub async fn exists(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(conn)
            .await
    }

    pub async fn exists_by_isbn(conn: &mut PgConnection, isbn: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
            .bind(isbn)
            .fetch_one(conn)
            .await
    }

    /// Overwrite every editable column. Fails with `RowNotFound` if the
    /// book does not exist.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &NewBook,
    ) -> Result<BookRow, sqlx::Error> {
        let query = format!(
            "UPDATE books SET
                title = $2,
                author = $3,
                isbn = $4,
                price = $5,
                publish_date = $6,
                publisher_id = $7,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.isbn)
            .bind(input.price)
            .bind(input.publish_date)
            .bind(input.publisher_id)
            .fetch_one(conn)
            .await
    }

    /// Permanently delete a book. The `book_details` row goes with it via
    /// `ON DELETE CASCADE`. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
