//! In-process catalog store.
//!
//! Honors the same contracts as the PostgreSQL store: the same constraint
//! names, cascade on book delete, restrict on publisher delete, the price
//! check. Read-write
//! units of work are serialized behind the write half of one async lock and
//! operate on a private copy of the state that replaces the shared state on
//! commit, so a dropped transaction leaves nothing behind. Read units of work
//! copy the committed state under a short shared lock and never block each
//! other.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use crate::book::{Book, BookDetail, BookDetailFields, NewBook};
use crate::publisher::{Publisher, PublisherRequest};
use crate::repository::{
    BookDetailRepository, BookRepository, CatalogStore, CatalogTx, PublisherRepository,
    StoreError, StoreResult, BOOK_DETAIL_BOOK_FK, BOOK_ISBN_CONSTRAINT, BOOK_PRICE_CHECK,
    BOOK_PUBLISHER_FK, PUBLISHER_NAME_CONSTRAINT,
};
use crate::types::DbId;

#[derive(Debug, Clone, Default)]
struct CatalogState {
    last_book_id: DbId,
    last_detail_id: DbId,
    last_publisher_id: DbId,
    books: BTreeMap<DbId, Book>,
    /// Keyed by owning book id.
    details: BTreeMap<DbId, BookDetail>,
    publishers: BTreeMap<DbId, Publisher>,
}

/// Shared handle to an in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    state: Arc<RwLock<CatalogState>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Unit of work over a [`MemoryCatalogStore`].
pub struct MemoryCatalogTx {
    /// `None` for a read unit of work, whose commit publishes nothing.
    guard: Option<OwnedRwLockWriteGuard<CatalogState>>,
    working: CatalogState,
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    type Tx = MemoryCatalogTx;

    async fn begin(&self) -> StoreResult<MemoryCatalogTx> {
        let guard = Arc::clone(&self.state).write_owned().await;
        let working = guard.clone();
        Ok(MemoryCatalogTx {
            guard: Some(guard),
            working,
        })
    }

    async fn begin_read(&self) -> StoreResult<MemoryCatalogTx> {
        let working = self.state.read().await.clone();
        Ok(MemoryCatalogTx {
            guard: None,
            working,
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl CatalogTx for MemoryCatalogTx {
    async fn commit(self) -> StoreResult<()> {
        let MemoryCatalogTx { guard, working } = self;
        if let Some(mut guard) = guard {
            *guard = working;
        }
        Ok(())
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl MemoryCatalogTx {
    fn filter_books(&self, keep: impl Fn(&Book) -> bool) -> Vec<Book> {
        self.working
            .books
            .values()
            .filter(|b| keep(b))
            .cloned()
            .collect()
    }

    fn check_isbn_free(&self, isbn: &str, owner: Option<DbId>) -> StoreResult<()> {
        let taken = self
            .working
            .books
            .values()
            .any(|b| b.isbn == isbn && Some(b.id) != owner);
        if taken {
            return Err(StoreError::UniqueViolation(BOOK_ISBN_CONSTRAINT.into()));
        }
        Ok(())
    }

    fn check_price(price: i32) -> StoreResult<()> {
        if price < 0 {
            return Err(StoreError::CheckViolation(BOOK_PRICE_CHECK.into()));
        }
        Ok(())
    }

    fn check_publisher_link(&self, publisher_id: Option<DbId>) -> StoreResult<()> {
        match publisher_id {
            Some(id) if !self.working.publishers.contains_key(&id) => {
                Err(StoreError::ForeignKeyViolation(BOOK_PUBLISHER_FK.into()))
            }
            _ => Ok(()),
        }
    }

    fn check_name_free(&self, name: &str, owner: Option<DbId>) -> StoreResult<()> {
        let taken = self
            .working
            .publishers
            .values()
            .any(|p| p.name == name && Some(p.id) != owner);
        if taken {
            return Err(StoreError::UniqueViolation(PUBLISHER_NAME_CONSTRAINT.into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BookRepository for MemoryCatalogTx {
    async fn find_book(&mut self, id: DbId) -> StoreResult<Option<Book>> {
        Ok(self.working.books.get(&id).cloned())
    }

    async fn find_book_for_update(&mut self, id: DbId) -> StoreResult<Option<Book>> {
        // Write units of work are already exclusive.
        self.find_book(id).await
    }

    async fn find_book_by_isbn(&mut self, isbn: &str) -> StoreResult<Option<Book>> {
        Ok(self.working.books.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn list_books(&mut self) -> StoreResult<Vec<Book>> {
        Ok(self.filter_books(|_| true))
    }

    async fn search_books_by_author(&mut self, fragment: &str) -> StoreResult<Vec<Book>> {
        Ok(self.filter_books(|b| contains_ignore_case(&b.author, fragment)))
    }

    async fn search_books_by_title(&mut self, fragment: &str) -> StoreResult<Vec<Book>> {
        Ok(self.filter_books(|b| contains_ignore_case(&b.title, fragment)))
    }

    async fn list_books_by_publisher(&mut self, publisher_id: DbId) -> StoreResult<Vec<Book>> {
        Ok(self.filter_books(|b| b.publisher_id == Some(publisher_id)))
    }

    async fn count_books_by_publisher(&mut self, publisher_id: DbId) -> StoreResult<i64> {
        let count = self
            .working
            .books
            .values()
            .filter(|b| b.publisher_id == Some(publisher_id))
            .count();
        Ok(count as i64)
    }

    async fn book_exists(&mut self, id: DbId) -> StoreResult<bool> {
        Ok(self.working.books.contains_key(&id))
    }

    async fn isbn_exists(&mut self, isbn: &str) -> StoreResult<bool> {
        Ok(self.working.books.values().any(|b| b.isbn == isbn))
    }

    async fn insert_book(&mut self, input: &NewBook) -> StoreResult<Book> {
        Self::check_price(input.price)?;
        self.check_isbn_free(&input.isbn, None)?;
        self.check_publisher_link(input.publisher_id)?;

        self.working.last_book_id += 1;
        let now = Utc::now();
        let book = Book {
            id: self.working.last_book_id,
            title: input.title.clone(),
            author: input.author.clone(),
            isbn: input.isbn.clone(),
            price: input.price,
            publish_date: input.publish_date,
            publisher_id: input.publisher_id,
            created_at: now,
            updated_at: now,
        };
        self.working.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn save_book(&mut self, book: &Book) -> StoreResult<Book> {
        if !self.working.books.contains_key(&book.id) {
            return Err(StoreError::Backend(format!("no book row with id {}", book.id)));
        }
        Self::check_price(book.price)?;
        self.check_isbn_free(&book.isbn, Some(book.id))?;
        self.check_publisher_link(book.publisher_id)?;

        let mut saved = book.clone();
        saved.updated_at = Utc::now();
        self.working.books.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn delete_book(&mut self, id: DbId) -> StoreResult<bool> {
        let removed = self.working.books.remove(&id).is_some();
        if removed {
            self.working.details.remove(&id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl BookDetailRepository for MemoryCatalogTx {
    async fn find_detail(&mut self, book_id: DbId) -> StoreResult<Option<BookDetail>> {
        Ok(self.working.details.get(&book_id).cloned())
    }

    async fn list_details(&mut self, book_ids: &[DbId]) -> StoreResult<Vec<BookDetail>> {
        Ok(book_ids
            .iter()
            .filter_map(|id| self.working.details.get(id).cloned())
            .collect())
    }

    async fn save_detail(
        &mut self,
        book_id: DbId,
        fields: &BookDetailFields,
    ) -> StoreResult<BookDetail> {
        if !self.working.books.contains_key(&book_id) {
            return Err(StoreError::ForeignKeyViolation(BOOK_DETAIL_BOOK_FK.into()));
        }

        let id = match self.working.details.get(&book_id) {
            Some(existing) => existing.id,
            None => {
                self.working.last_detail_id += 1;
                self.working.last_detail_id
            }
        };
        let detail = BookDetail {
            id,
            book_id,
            fields: fields.clone(),
        };
        self.working.details.insert(book_id, detail.clone());
        Ok(detail)
    }
}

#[async_trait]
impl PublisherRepository for MemoryCatalogTx {
    async fn find_publisher(&mut self, id: DbId) -> StoreResult<Option<Publisher>> {
        Ok(self.working.publishers.get(&id).cloned())
    }

    async fn find_publisher_by_name(&mut self, name: &str) -> StoreResult<Option<Publisher>> {
        Ok(self
            .working
            .publishers
            .values()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn list_publishers(&mut self) -> StoreResult<Vec<Publisher>> {
        Ok(self.working.publishers.values().cloned().collect())
    }

    async fn list_publishers_by_ids(&mut self, ids: &[DbId]) -> StoreResult<Vec<Publisher>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.working.publishers.get(id).cloned())
            .collect())
    }

    async fn publisher_exists(&mut self, id: DbId) -> StoreResult<bool> {
        Ok(self.working.publishers.contains_key(&id))
    }

    async fn publisher_name_exists(&mut self, name: &str) -> StoreResult<bool> {
        Ok(self.working.publishers.values().any(|p| p.name == name))
    }

    async fn insert_publisher(&mut self, input: &PublisherRequest) -> StoreResult<Publisher> {
        self.check_name_free(&input.name, None)?;

        self.working.last_publisher_id += 1;
        let now = Utc::now();
        let publisher = Publisher {
            id: self.working.last_publisher_id,
            name: input.name.clone(),
            established_date: input.established_date,
            address: input.address.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working
            .publishers
            .insert(publisher.id, publisher.clone());
        Ok(publisher)
    }

    async fn save_publisher(&mut self, publisher: &Publisher) -> StoreResult<Publisher> {
        if !self.working.publishers.contains_key(&publisher.id) {
            return Err(StoreError::Backend(format!(
                "no publisher row with id {}",
                publisher.id
            )));
        }
        self.check_name_free(&publisher.name, Some(publisher.id))?;

        let mut saved = publisher.clone();
        saved.updated_at = Utc::now();
        self.working.publishers.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn delete_publisher(&mut self, id: DbId) -> StoreResult<bool> {
        if self
            .working
            .books
            .values()
            .any(|b| b.publisher_id == Some(id))
        {
            return Err(StoreError::ForeignKeyViolation(BOOK_PUBLISHER_FK.into()));
        }
        Ok(self.working.publishers.remove(&id).is_some())
    }
}
