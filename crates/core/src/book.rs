//! Book aggregate model: the book row, its exclusively owned detail record,
//! and the request/response structures the services accept and return.
//!
//! Ownership is explicit: a `books` row carries `publisher_id`, a
//! `book_details` row carries `book_id`. Neither side stores a back-pointer.

use serde::{Deserialize, Serialize};

use crate::publisher::PublisherRef;
use crate::types::{Date, DbId, Timestamp};

/// A row from the `books` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub id: DbId,
    pub title: String,
    pub author: String,
    /// Unique across all books (`uq_books_isbn`).
    pub isbn: String,
    pub price: i32,
    pub publish_date: Option<Date>,
    pub publisher_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The editable columns of a `book_details` row.
///
/// Used both as the stored value and as the nested request payload. In a
/// patch, `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetailFields {
    pub description: Option<String>,
    pub language: Option<String>,
    pub page_count: Option<i32>,
    /// Free-text imprint line. Unrelated to the `Publisher` entity.
    pub publisher: Option<String>,
    pub cover_image_url: Option<String>,
    pub edition: Option<String>,
}

impl BookDetailFields {
    /// Merge a patch into these fields. Supplied values win, omitted ones keep
    /// their current value. A patch can never clear a field.
    pub fn merge(&mut self, patch: &BookDetailFields) {
        merge_field(&mut self.description, &patch.description);
        merge_field(&mut self.language, &patch.language);
        merge_field(&mut self.page_count, &patch.page_count);
        merge_field(&mut self.publisher, &patch.publisher);
        merge_field(&mut self.cover_image_url, &patch.cover_image_url);
        merge_field(&mut self.edition, &patch.edition);
    }
}

fn merge_field<T: Clone>(current: &mut Option<T>, patch: &Option<T>) {
    if let Some(value) = patch {
        *current = Some(value.clone());
    }
}

/// A row from the `book_details` table, 1:1 with its owning book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDetail {
    pub id: DbId,
    pub book_id: DbId,
    #[serde(flatten)]
    pub fields: BookDetailFields,
}

/// Column values for inserting a new `books` row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: i32,
    pub publish_date: Option<Date>,
    pub publisher_id: Option<DbId>,
}

/// Request body for creating a book or fully replacing its editable fields.
#[derive(Debug, Clone, Deserialize)]
pub struct BookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: i32,
    pub publish_date: Option<Date>,
    pub publisher_id: Option<DbId>,
    /// When present on create, a detail record is created with the book.
    /// When present on update, the detail is created or overwritten wholesale.
    pub detail: Option<BookDetailFields>,
}

impl BookRequest {
    pub fn new_book(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
            price: self.price,
            publish_date: self.publish_date,
            publisher_id: self.publisher_id,
        }
    }
}

/// Request body for a partial update. Only supplied fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub price: Option<i32>,
    pub publish_date: Option<Date>,
    pub publisher_id: Option<DbId>,
    pub detail: Option<BookDetailFields>,
}

impl BookPatch {
    /// A patch that touches only the nested detail.
    pub fn detail_only(detail: BookDetailFields) -> Self {
        BookPatch {
            detail: Some(detail),
            ..Default::default()
        }
    }
}

impl Book {
    /// Overwrite every editable column from a full-replace request.
    pub fn replace_with(&mut self, request: &BookRequest) {
        self.title = request.title.clone();
        self.author = request.author.clone();
        self.isbn = request.isbn.clone();
        self.price = request.price;
        self.publish_date = request.publish_date;
        self.publisher_id = request.publisher_id;
    }

    /// Apply the supplied scalar fields of a patch. The nested detail is
    /// handled separately since it lives in its own row.
    pub fn apply_patch(&mut self, patch: &BookPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(author) = &patch.author {
            self.author = author.clone();
        }
        if let Some(isbn) = &patch.isbn {
            self.isbn = isbn.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(date) = patch.publish_date {
            self.publish_date = Some(date);
        }
        if let Some(publisher_id) = patch.publisher_id {
            self.publisher_id = Some(publisher_id);
        }
    }
}

/// A book with its detail and publisher link eagerly attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    pub detail: Option<BookDetail>,
    pub publisher: Option<PublisherRef>,
}
