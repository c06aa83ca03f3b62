//! Repository for the `book_details` table.

use bookshelf_core::book::BookDetailFields;
use bookshelf_core::types::DbId;
use sqlx::PgConnection;

use crate::models::book::BookDetailRow;

const COLUMNS: &str =
    "id, book_id, description, language, page_count, publisher, cover_image_url, edition";

pub struct BookDetailRepo;

impl BookDetailRepo {
    pub async fn find_by_book_id(
        conn: &mut PgConnection,
        book_id: DbId,
    ) -> Result<Option<BookDetailRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM book_details WHERE book_id = $1");
        sqlx::query_as::<_, BookDetailRow>(&query)
            .bind(book_id)
            .fetch_optional(conn)
            .await
    }

    /// Fetch the details of many books in one round trip.
    pub async fn list_by_book_ids(
        conn: &mut PgConnection,
        book_ids: &[DbId],
    ) -> Result<Vec<BookDetailRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM book_details WHERE book_id = ANY($1)");
        sqlx::query_as::<_, BookDetailRow>(&query)
            .bind(book_ids)
            .fetch_all(conn)
            .await
    }

    /// Insert the detail for a book, or overwrite every column of the
    /// existing one (keyed on `uq_book_details_book_id`).
    pub async fn upsert(
        conn: &mut PgConnection,
        book_id: DbId,
        fields: &BookDetailFields,
    ) -> Result<BookDetailRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO book_details
                (book_id, description, language, page_count, publisher, cover_image_url, edition)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (book_id) DO UPDATE SET
                description = EXCLUDED.description,
                language = EXCLUDED.language,
                page_count = EXCLUDED.page_count,
                publisher = EXCLUDED.publisher,
                cover_image_url = EXCLUDED.cover_image_url,
                edition = EXCLUDED.edition
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookDetailRow>(&query)
            .bind(book_id)
            .bind(&fields.description)
            .bind(&fields.language)
            .bind(fields.page_count)
            .bind(&fields.publisher)
            .bind(&fields.cover_image_url)
            .bind(&fields.edition)
            .fetch_one(conn)
            .await
    }
}
