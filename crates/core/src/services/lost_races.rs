//! Services losing a race to a concurrent writer.
//!
//! [`StaleChecksStore`] answers every pre-check in a read-write unit of work
//! as if the competing write had not landed yet, while the storage
//! constraints still see the real state. Each test then asserts the service
//! reports the same error the pre-check would have raised.

use assert_matches::assert_matches;
use async_trait::async_trait;

use crate::book::{Book, BookDetail, BookDetailFields, BookPatch, BookRequest, NewBook};
use crate::error::CoreError;
use crate::memory::{MemoryCatalogStore, MemoryCatalogTx};
use crate::publisher::{Publisher, PublisherRequest};
use crate::repository::{
    BookDetailRepository, BookRepository, CatalogStore, CatalogTx, PublisherRepository,
    StoreResult,
};
use crate::services::{BookService, PublisherService};
use crate::types::DbId;

#[derive(Debug, Clone, Default)]
struct StaleChecksStore {
    inner: MemoryCatalogStore,
}

struct StaleChecksTx {
    inner: MemoryCatalogTx,
    stale: bool,
}

#[async_trait]
impl CatalogStore for StaleChecksStore {
    type Tx = StaleChecksTx;

    async fn begin(&self) -> StoreResult<StaleChecksTx> {
        Ok(StaleChecksTx {
            inner: self.inner.begin().await?,
            stale: true,
        })
    }

    async fn begin_read(&self) -> StoreResult<StaleChecksTx> {
        Ok(StaleChecksTx {
            inner: self.inner.begin_read().await?,
            stale: false,
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }
}

#[async_trait]
impl CatalogTx for StaleChecksTx {
    async fn commit(self) -> StoreResult<()> {
        self.inner.commit().await
    }
}

#[async_trait]
impl BookRepository for StaleChecksTx {
    async fn find_book(&mut self, id: DbId) -> StoreResult<Option<Book>> {
        self.inner.find_book(id).await
    }

    async fn find_book_for_update(&mut self, id: DbId) -> StoreResult<Option<Book>> {
        self.inner.find_book_for_update(id).await
    }

    async fn find_book_by_isbn(&mut self, isbn: &str) -> StoreResult<Option<Book>> {
        self.inner.find_book_by_isbn(isbn).await
    }

    async fn list_books(&mut self) -> StoreResult<Vec<Book>> {
        self.inner.list_books().await
    }

    async fn search_books_by_author(&mut self, fragment: &str) -> StoreResult<Vec<Book>> {
        self.inner.search_books_by_author(fragment).await
    }

    async fn search_books_by_title(&mut self, fragment: &str) -> StoreResult<Vec<Book>> {
        self.inner.search_books_by_title(fragment).await
    }

    async fn list_books_by_publisher(&mut self, publisher_id: DbId) -> StoreResult<Vec<Book>> {
        self.inner.list_books_by_publisher(publisher_id).await
    }

    async fn count_books_by_publisher(&mut self, publisher_id: DbId) -> StoreResult<i64> {
        if self.stale {
            return Ok(0);
        }
        self.inner.count_books_by_publisher(publisher_id).await
    }

    async fn book_exists(&mut self, id: DbId) -> StoreResult<bool> {
        self.inner.book_exists(id).await
    }

    async fn isbn_exists(&mut self, isbn: &str) -> StoreResult<bool> {
        if self.stale {
            return Ok(false);
        }
        self.inner.isbn_exists(isbn).await
    }

    async fn insert_book(&mut self, input: &NewBook) -> StoreResult<Book> {
        self.inner.insert_book(input).await
    }

    async fn save_book(&mut self, book: &Book) -> StoreResult<Book> {
        self.inner.save_book(book).await
    }

    async fn delete_book(&mut self, id: DbId) -> StoreResult<bool> {
        self.inner.delete_book(id).await
    }
}

#[async_trait]
impl BookDetailRepository for StaleChecksTx {
    async fn find_detail(&mut self, book_id: DbId) -> StoreResult<Option<BookDetail>> {
        self.inner.find_detail(book_id).await
    }

    async fn list_details(&mut self, book_ids: &[DbId]) -> StoreResult<Vec<BookDetail>> {
        self.inner.list_details(book_ids).await
    }

    async fn save_detail(
        &mut self,
        book_id: DbId,
        fields: &BookDetailFields,
    ) -> StoreResult<BookDetail> {
        self.inner.save_detail(book_id, fields).await
    }
}

#[async_trait]
impl PublisherRepository for StaleChecksTx {
    async fn find_publisher(&mut self, id: DbId) -> StoreResult<Option<Publisher>> {
        self.inner.find_publisher(id).await
    }

    async fn find_publisher_by_name(&mut self, name: &str) -> StoreResult<Option<Publisher>> {
        self.inner.find_publisher_by_name(name).await
    }

    async fn list_publishers(&mut self) -> StoreResult<Vec<Publisher>> {
        self.inner.list_publishers().await
    }

    async fn list_publishers_by_ids(&mut self, ids: &[DbId]) -> StoreResult<Vec<Publisher>> {
        self.inner.list_publishers_by_ids(ids).await
    }

    async fn publisher_exists(&mut self, id: DbId) -> StoreResult<bool> {
        if self.stale {
            return Ok(true);
        }
        self.inner.publisher_exists(id).await
    }

    async fn publisher_name_exists(&mut self, name: &str) -> StoreResult<bool> {
        if self.stale {
            return Ok(false);
        }
        self.inner.publisher_name_exists(name).await
    }

    async fn insert_publisher(&mut self, input: &PublisherRequest) -> StoreResult<Publisher> {
        self.inner.insert_publisher(input).await
    }

    async fn save_publisher(&mut self, publisher: &Publisher) -> StoreResult<Publisher> {
        self.inner.save_publisher(publisher).await
    }

    async fn delete_publisher(&mut self, id: DbId) -> StoreResult<bool> {
        self.inner.delete_publisher(id).await
    }
}

fn services() -> (BookService<StaleChecksStore>, PublisherService<StaleChecksStore>) {
    let store = StaleChecksStore::default();
    (BookService::new(store.clone()), PublisherService::new(store))
}

fn request(isbn: &str, publisher_id: Option<DbId>) -> BookRequest {
    BookRequest {
        title: "A".into(),
        author: "B".into(),
        isbn: isbn.into(),
        price: 1000,
        publish_date: None,
        publisher_id,
        detail: None,
    }
}

fn publisher_request(name: &str) -> PublisherRequest {
    PublisherRequest {
        name: name.into(),
        established_date: None,
        address: None,
    }
}

#[tokio::test]
async fn create_with_taken_isbn_is_a_duplicate() {
    let (books, _) = services();
    books.create(&request("111", None)).await.unwrap();

    assert_matches!(
        books.create(&request("111", None)).await,
        Err(CoreError::IsbnDuplicate { isbn }) if isbn == "111"
    );
    assert_eq!(books.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_and_patch_to_taken_isbn_are_duplicates() {
    let (books, _) = services();
    let first = books.create(&request("111", None)).await.unwrap().book;
    books.create(&request("222", None)).await.unwrap();

    let mut replace = request("222", None);
    replace.title = "Should not stick".into();
    assert_matches!(
        books.update(first.id, &replace).await,
        Err(CoreError::IsbnDuplicate { isbn }) if isbn == "222"
    );

    let patch = BookPatch {
        isbn: Some("222".into()),
        title: Some("Should not stick".into()),
        ..Default::default()
    };
    assert_matches!(
        books.partial_update(first.id, &patch).await,
        Err(CoreError::IsbnDuplicate { isbn }) if isbn == "222"
    );

    let current = books.get_by_id(first.id).await.unwrap().book;
    assert_eq!(current.isbn, "111");
    assert_eq!(current.title, "A");
}

#[tokio::test]
async fn vanished_publisher_is_not_found_on_book_writes() {
    let (books, _) = services();

    assert_matches!(
        books.create(&request("111", Some(77))).await,
        Err(CoreError::NotFound { entity: "Publisher", value, .. }) if value == "77"
    );
    assert!(books.list_all().await.unwrap().is_empty());

    let book = books.create(&request("111", None)).await.unwrap().book;
    let patch = BookPatch {
        publisher_id: Some(78),
        ..Default::default()
    };
    assert_matches!(
        books.partial_update(book.id, &patch).await,
        Err(CoreError::NotFound { entity: "Publisher", value, .. }) if value == "78"
    );
    assert_matches!(
        books.update(book.id, &request("111", Some(79))).await,
        Err(CoreError::NotFound { entity: "Publisher", value, .. }) if value == "79"
    );
    assert_eq!(books.get_by_id(book.id).await.unwrap().book.publisher_id, None);
}

#[tokio::test]
async fn publisher_delete_reports_books_found_by_the_constraint() {
    let (books, publishers) = services();
    let acme = publishers
        .create(&publisher_request("Acme"))
        .await
        .unwrap()
        .publisher
        .id;
    books.create(&request("1", Some(acme))).await.unwrap();
    books.create(&request("2", Some(acme))).await.unwrap();

    assert_matches!(
        publishers.delete(acme).await,
        Err(CoreError::PublisherHasBooks { id, book_count: 2 }) if id == acme
    );
    assert_eq!(publishers.get_by_id(acme).await.unwrap().books.len(), 2);
}

#[tokio::test]
async fn publisher_writes_with_taken_name_are_duplicates() {
    let (_, publishers) = services();
    publishers.create(&publisher_request("Acme")).await.unwrap();
    let globex = publishers
        .create(&publisher_request("Globex"))
        .await
        .unwrap()
        .publisher
        .id;

    assert_matches!(
        publishers.create(&publisher_request("Acme")).await,
        Err(CoreError::PublisherNameDuplicate { name }) if name == "Acme"
    );
    assert_matches!(
        publishers.update(globex, &publisher_request("Acme")).await,
        Err(CoreError::PublisherNameDuplicate { name }) if name == "Acme"
    );
    assert_eq!(publishers.list_all().await.unwrap().len(), 2);
    assert_eq!(
        publishers.get_by_id(globex).await.unwrap().publisher.name,
        "Globex"
    );
}
