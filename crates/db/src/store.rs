//! [`CatalogStore`] backed by a PostgreSQL pool.

use async_trait::async_trait;
use bookshelf_core::book::{Book, BookDetail, BookDetailFields, NewBook};
use bookshelf_core::publisher::{Publisher, PublisherRequest};
use bookshelf_core::repository::{
    BookDetailRepository, BookRepository, CatalogStore, CatalogTx, PublisherRepository,
    StoreResult,
};
use bookshelf_core::types::DbId;
use sqlx::{Postgres, Transaction};

use crate::error::classify;
use crate::repositories::{BookDetailRepo, BookRepo, PublisherRepo};
use crate::DbPool;

/// Hands out one database transaction per unit of work.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: DbPool,
}

impl PgCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// An open transaction. Rolled back by sqlx when dropped uncommitted.
pub struct PgCatalogTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    type Tx = PgCatalogTx;

    async fn begin(&self) -> StoreResult<PgCatalogTx> {
        let tx = self.pool.begin().await.map_err(classify)?;
        Ok(PgCatalogTx { tx })
    }

    /// Reads run against a single snapshot so lists and their counts agree.
    async fn begin_read(&self) -> StoreResult<PgCatalogTx> {
        let mut tx = self.pool.begin().await.map_err(classify)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(classify)?;
        Ok(PgCatalogTx { tx })
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await.map_err(classify)
    }
}

#[async_trait]
impl CatalogTx for PgCatalogTx {
    async fn commit(self) -> StoreResult<()> {
        self.tx.commit().await.map_err(classify)
    }
}

fn book_columns(book: &Book) -> NewBook {
    NewBook {
        title: book.title.clone(),
        author: book.author.clone(),
        isbn: book.isbn.clone(),
        price: book.price,
        publish_date: book.publish_date,
        publisher_id: book.publisher_id,
    }
}

fn publisher_columns(publisher: &Publisher) -> PublisherRequest {
    PublisherRequest {
        name: publisher.name.clone(),
        established_date: publisher.established_date,
        address: publisher.address.clone(),
    }
}

fn into_books(rows: Vec<crate::models::book::BookRow>) -> Vec<Book> {
    rows.into_iter().map(Book::from).collect()
}

#[async_trait]
impl BookRepository for PgCatalogTx {
    async fn find_book(&mut self, id: DbId) -> StoreResult<Option<Book>> {
        let row = BookRepo::find_by_id(&mut *self.tx, id).await.map_err(classify)?;
        Ok(row.map(Book::from))
    }

    async fn find_book_for_update(&mut self, id: DbId) -> StoreResult<Option<Book>> {
        let row = BookRepo::find_by_id_for_update(&mut *self.tx, id)
            .await
            .map_err(classify)?;
        Ok(row.map(Book::from))
    }

    async fn find_book_by_isbn(&mut self, isbn: &str) -> StoreResult<Option<Book>> {
        let row = BookRepo::find_by_isbn(&mut *self.tx, isbn)
            .await
            .map_err(classify)?;
        Ok(row.map(Book::from))
    }

    async fn list_books(&mut self) -> StoreResult<Vec<Book>> {
        let rows = BookRepo::list(&mut *self.tx).await.map_err(classify)?;
        Ok(into_books(rows))
    }

    async fn search_books_by_author(&mut self, fragment: &str) -> StoreResult<Vec<Book>> {
        let rows = BookRepo::search_by_author(&mut *self.tx, fragment)
            .await
            .map_err(classify)?;
        Ok(into_books(rows))
    }

    async fn search_books_by_title(&mut self, fragment: &str) -> StoreResult<Vec<Book>> {
        let rows = BookRepo::search_by_title(&mut *self.tx, fragment)
            .await
            .map_err(classify)?;
        Ok(into_books(rows))
    }

    async fn list_books_by_publisher(&mut self, publisher_id: DbId) -> StoreResult<Vec<Book>> {
        let rows = BookRepo::list_by_publisher(&mut *self.tx, publisher_id)
            .await
            .map_err(classify)?;
        Ok(into_books(rows))
    }

    async fn count_books_by_publisher(&mut self, publisher_id: DbId) -> StoreResult<i64> {
        BookRepo::count_by_publisher(&mut *self.tx, publisher_id)
            .await
            .map_err(classify)
    }

    async fn book_exists(&mut self, id: DbId) -> StoreResult<bool> {
        BookRepo::exists(&mut *self.tx, id).await.map_err(classify)
    }

    async fn isbn_exists(&mut self, isbn: &str) -> StoreResult<bool> {
        BookRepo::exists_by_isbn(&mut *self.tx, isbn)
            .await
            .map_err(classify)
    }

    async fn insert_book(&mut self, input: &NewBook) -> StoreResult<Book> {
        let row = BookRepo::create(&mut *self.tx, input)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }

    async fn save_book(&mut self, book: &Book) -> StoreResult<Book> {
        let row = BookRepo::update(&mut *self.tx, book.id, &book_columns(book))
            .await
            .map_err(classify)?;
        Ok(row.into())
    }

    async fn delete_book(&mut self, id: DbId) -> StoreResult<bool> {
        BookRepo::delete(&mut *self.tx, id).await.map_err(classify)
    }
}

#[async_trait]
impl BookDetailRepository for PgCatalogTx {
    async fn find_detail(&mut self, book_id: DbId) -> StoreResult<Option<BookDetail>> {
        let row = BookDetailRepo::find_by_book_id(&mut *self.tx, book_id)
            .await
            .map_err(classify)?;
        Ok(row.map(BookDetail::from))
    }

    async fn list_details(&mut self, book_ids: &[DbId]) -> StoreResult<Vec<BookDetail>> {
        let rows = BookDetailRepo::list_by_book_ids(&mut *self.tx, book_ids)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(BookDetail::from).collect())
    }

    async fn save_detail(
        &mut self,
        book_id: DbId,
        fields: &BookDetailFields,
    ) -> StoreResult<BookDetail> {
        let row = BookDetailRepo::upsert(&mut *self.tx, book_id, fields)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }
}

#[async_trait]
impl PublisherRepository for PgCatalogTx {
    async fn find_publisher(&mut self, id: DbId) -> StoreResult<Option<Publisher>> {
        let row = PublisherRepo::find_by_id(&mut *self.tx, id)
            .await
            .map_err(classify)?;
        Ok(row.map(Publisher::from))
    }

    async fn find_publisher_by_name(&mut self, name: &str) -> StoreResult<Option<Publisher>> {
        let row = PublisherRepo::find_by_name(&mut *self.tx, name)
            .await
            .map_err(classify)?;
        Ok(row.map(Publisher::from))
    }

    async fn list_publishers(&mut self) -> StoreResult<Vec<Publisher>> {
        let rows = PublisherRepo::list(&mut *self.tx).await.map_err(classify)?;
        Ok(rows.into_iter().map(Publisher::from).collect())
    }

    async fn list_publishers_by_ids(&mut self, ids: &[DbId]) -> StoreResult<Vec<Publisher>> {
        let rows = PublisherRepo::list_by_ids(&mut *self.tx, ids)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Publisher::from).collect())
    }

    async fn publisher_exists(&mut self, id: DbId) -> StoreResult<bool> {
        PublisherRepo::exists(&mut *self.tx, id)
            .await
            .map_err(classify)
    }

    async fn publisher_name_exists(&mut self, name: &str) -> StoreResult<bool> {
        PublisherRepo::exists_by_name(&mut *self.tx, name)
            .await
            .map_err(classify)
    }

    async fn insert_publisher(&mut self, input: &PublisherRequest) -> StoreResult<Publisher> {
        let row = PublisherRepo::create(&mut *self.tx, input)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }

    async fn save_publisher(&mut self, publisher: &Publisher) -> StoreResult<Publisher> {
        let row = PublisherRepo::update(&mut *self.tx, publisher.id, &publisher_columns(publisher))
            .await
            .map_err(classify)?;
        Ok(row.into())
    }

    async fn delete_publisher(&mut self, id: DbId) -> StoreResult<bool> {
        PublisherRepo::delete(&mut *self.tx, id)
            .await
            .map_err(classify)
    }
}
