//! Rows from the `books` and `book_details` tables.

use bookshelf_core::book::{Book, BookDetail, BookDetailFields};
use bookshelf_core::types::{Date, DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `books` table.
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: DbId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: i32,
    pub publish_date: Option<Date>,
    pub publisher_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            title: row.title,
            author: row.author,
            isbn: row.isbn,
            price: row.price,
            publish_date: row.publish_date,
            publisher_id: row.publisher_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A row from the `book_details` table.
#[derive(Debug, Clone, FromRow)]
pub struct BookDetailRow {
    pub id: DbId,
    pub book_id: DbId,
    pub description: Option<String>,
    pub language: Option<String>,
    pub page_count: Option<i32>,
    pub publisher: Option<String>,
    pub cover_image_url: Option<String>,
    pub edition: Option<String>,
}

impl From<BookDetailRow> for BookDetail {
    fn from(row: BookDetailRow) -> Self {
        BookDetail {
            id: row.id,
            book_id: row.book_id,
            fields: BookDetailFields {
                description: row.description,
                language: row.language,
                page_count: row.page_count,
                publisher: row.publisher,
                cover_image_url: row.cover_image_url,
                edition: row.edition,
            },
        }
    }
}
