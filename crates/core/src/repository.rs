//! Persistence contracts the services depend on.
//!
//! A storage backend hands out a unit of work ([`CatalogTx`]) from
//! [`CatalogStore::begin`]. Every repository operation runs inside that unit
//! of work; [`CatalogTx::commit`] publishes the writes and dropping the
//! transaction without committing discards them. Uniqueness and count queries
//! observe the latest state visible to the transaction, including its own
//! uncommitted writes.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::book::{Book, BookDetail, BookDetailFields, BookView, NewBook};
use crate::publisher::{Publisher, PublisherRef, PublisherRequest};
use crate::types::DbId;

/// Unique constraint on `books.isbn`.
pub const BOOK_ISBN_CONSTRAINT: &str = "uq_books_isbn";
/// Unique constraint on `publishers.name`.
pub const PUBLISHER_NAME_CONSTRAINT: &str = "uq_publishers_name";
/// Foreign key `books.publisher_id -> publishers.id` (ON DELETE RESTRICT).
pub const BOOK_PUBLISHER_FK: &str = "fk_books_publisher_id";
/// Foreign key `book_details.book_id -> books.id` (ON DELETE CASCADE).
pub const BOOK_DETAIL_BOOK_FK: &str = "fk_book_details_book_id";
/// Check constraint `books.price >= 0`.
pub const BOOK_PRICE_CHECK: &str = "ck_books_price_non_negative";

/// Failure reported by a storage backend.
///
/// Constraint violations carry the constraint name so services can turn a
/// race lost at the storage layer into the same error the pre-check raises.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("check constraint violated: {0}")]
    CheckViolation(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait BookRepository: Send {
    async fn find_book(&mut self, id: DbId) -> StoreResult<Option<Book>>;

    /// Like [`find_book`](Self::find_book), but holds the row until the unit
    /// of work ends so a concurrent read-modify-write waits for this one.
    async fn find_book_for_update(&mut self, id: DbId) -> StoreResult<Option<Book>>;

    async fn find_book_by_isbn(&mut self, isbn: &str) -> StoreResult<Option<Book>>;

    /// All books in insertion (id) order.
    async fn list_books(&mut self) -> StoreResult<Vec<Book>>;

    /// Case-insensitive substring match on `author`, id order.
    async fn search_books_by_author(&mut self, fragment: &str) -> StoreResult<Vec<Book>>;

    /// Case-insensitive substring match on `title`, id order.
    async fn search_books_by_title(&mut self, fragment: &str) -> StoreResult<Vec<Book>>;

    async fn list_books_by_publisher(&mut self, publisher_id: DbId) -> StoreResult<Vec<Book>>;

    async fn count_books_by_publisher(&mut self, publisher_id: DbId) -> StoreResult<i64>;

    async fn book_exists(&mut self, id: DbId) -> StoreResult<bool>;

    async fn isbn_exists(&mut self, isbn: &str) -> StoreResult<bool>;

    async fn insert_book(&mut self, input: &NewBook) -> StoreResult<Book>;

    /// Persist every editable column of an existing book.
    async fn save_book(&mut self, book: &Book) -> StoreResult<Book>;

    /// Remove a book and, by cascade, its detail. Returns `true` if a row was removed.
    async fn delete_book(&mut self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait BookDetailRepository: Send {
    async fn find_detail(&mut self, book_id: DbId) -> StoreResult<Option<BookDetail>>;

    async fn list_details(&mut self, book_ids: &[DbId]) -> StoreResult<Vec<BookDetail>>;

    /// Create the book's detail, or overwrite every column of the existing one.
    async fn save_detail(
        &mut self,
        book_id: DbId,
        fields: &BookDetailFields,
    ) -> StoreResult<BookDetail>;
}

#[async_trait]
pub trait PublisherRepository: Send {
    async fn find_publisher(&mut self, id: DbId) -> StoreResult<Option<Publisher>>;

    async fn find_publisher_by_name(&mut self, name: &str) -> StoreResult<Option<Publisher>>;

    /// All publishers in insertion (id) order.
    async fn list_publishers(&mut self) -> StoreResult<Vec<Publisher>>;

    async fn list_publishers_by_ids(&mut self, ids: &[DbId]) -> StoreResult<Vec<Publisher>>;

    async fn publisher_exists(&mut self, id: DbId) -> StoreResult<bool>;

    async fn publisher_name_exists(&mut self, name: &str) -> StoreResult<bool>;

    async fn insert_publisher(&mut self, input: &PublisherRequest) -> StoreResult<Publisher>;

    async fn save_publisher(&mut self, publisher: &Publisher) -> StoreResult<Publisher>;

    /// Fails with [`StoreError::ForeignKeyViolation`] while books still reference it.
    async fn delete_publisher(&mut self, id: DbId) -> StoreResult<bool>;
}

/// One atomic unit of work over the whole catalog.
#[async_trait]
pub trait CatalogTx: BookRepository + BookDetailRepository + PublisherRepository + Send {
    async fn commit(self) -> StoreResult<()>;

    /// Eagerly attach each book's detail and publisher reference.
    ///
    /// Performs one detail lookup and one publisher lookup for the whole
    /// batch. Input order is preserved.
    async fn attach_relations(&mut self, books: Vec<Book>) -> StoreResult<Vec<BookView>> {
        let ids: Vec<DbId> = books.iter().map(|b| b.id).collect();
        let mut details: HashMap<DbId, BookDetail> = self
            .list_details(&ids)
            .await?
            .into_iter()
            .map(|d| (d.book_id, d))
            .collect();

        let mut publisher_ids: Vec<DbId> = books.iter().filter_map(|b| b.publisher_id).collect();
        publisher_ids.sort_unstable();
        publisher_ids.dedup();
        let publishers: HashMap<DbId, PublisherRef> = if publisher_ids.is_empty() {
            HashMap::new()
        } else {
            self.list_publishers_by_ids(&publisher_ids)
                .await?
                .iter()
                .map(|p| (p.id, PublisherRef::from(p)))
                .collect()
        };

        Ok(books
            .into_iter()
            .map(|book| BookView {
                detail: details.remove(&book.id),
                publisher: book.publisher_id.and_then(|id| publishers.get(&id).cloned()),
                book,
            })
            .collect())
    }

    /// Find a book by id with its detail and publisher attached.
    async fn fetch_book_view(&mut self, id: DbId) -> StoreResult<Option<BookView>> {
        match self.find_book(id).await? {
            Some(book) => Ok(self.attach_relations(vec![book]).await?.pop()),
            None => Ok(None),
        }
    }
}

/// Factory for units of work. Cheap to clone; services hold one each.
#[async_trait]
pub trait CatalogStore: Clone + Send + Sync + 'static {
    type Tx: CatalogTx;

    /// Begin a read-write unit of work.
    async fn begin(&self) -> StoreResult<Self::Tx>;

    /// Begin a unit of work that only reads, against one consistent snapshot.
    async fn begin_read(&self) -> StoreResult<Self::Tx> {
        self.begin().await
    }

    /// Cheap liveness probe used by the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}
