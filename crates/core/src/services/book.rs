//! Book aggregate service: a book plus the detail record it owns.

use crate::book::{BookPatch, BookRequest, BookView};
use crate::error::{CoreError, CoreResult};
use crate::repository::{BookDetailRepository, BookRepository, CatalogStore, CatalogTx};
use crate::types::DbId;

use super::{book_write_error, ensure_publisher_exists};

/// Create, read, update, patch and delete books.
#[derive(Debug, Clone)]
pub struct BookService<S> {
    store: S,
}

impl<S: CatalogStore> BookService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every book in insertion order, detail and publisher attached.
    pub async fn list_all(&self) -> CoreResult<Vec<BookView>> {
        let mut tx = self.store.begin_read().await?;
        let books = tx.list_books().await?;
        Ok(tx.attach_relations(books).await?)
    }

    pub async fn get_by_id(&self, id: DbId) -> CoreResult<BookView> {
        let mut tx = self.store.begin_read().await?;
        tx.fetch_book_view(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Book", "id", id))
    }

    pub async fn get_by_isbn(&self, isbn: &str) -> CoreResult<BookView> {
        let mut tx = self.store.begin_read().await?;
        let book = tx
            .find_book_by_isbn(isbn)
            .await?
            .ok_or_else(|| CoreError::not_found("Book", "ISBN", isbn))?;
        let mut views = tx.attach_relations(vec![book]).await?;
        views
            .pop()
            .ok_or_else(|| CoreError::Internal("book view lost while attaching relations".into()))
    }

    /// Case-insensitive substring search on author. No match is an empty list.
    pub async fn search_by_author(&self, fragment: &str) -> CoreResult<Vec<BookView>> {
        let mut tx = self.store.begin_read().await?;
        let books = tx.search_books_by_author(fragment).await?;
        Ok(tx.attach_relations(books).await?)
    }

    /// Case-insensitive substring search on title. No match is an empty list.
    pub async fn search_by_title(&self, fragment: &str) -> CoreResult<Vec<BookView>> {
        let mut tx = self.store.begin_read().await?;
        let books = tx.search_books_by_title(fragment).await?;
        Ok(tx.attach_relations(books).await?)
    }

    /// Create a book, and its detail when the request carries one, atomically.
    pub async fn create(&self, request: &BookRequest) -> CoreResult<BookView> {
        let mut tx = self.store.begin().await?;

        if tx.isbn_exists(&request.isbn).await? {
            return Err(CoreError::IsbnDuplicate {
                isbn: request.isbn.clone(),
            });
        }
        if let Some(publisher_id) = request.publisher_id {
            ensure_publisher_exists(&mut tx, publisher_id).await?;
        }

        let book = tx
            .insert_book(&request.new_book())
            .await
            .map_err(|e| book_write_error(e, &request.isbn, request.publisher_id))?;
        if let Some(fields) = &request.detail {
            tx.save_detail(book.id, fields).await?;
        }

        let view = self.finish(tx, book.id, &request.isbn, request.publisher_id).await?;
        tracing::info!(book_id = view.book.id, isbn = %view.book.isbn, "Book created");
        Ok(view)
    }

    /// Replace every editable field. A supplied detail is created if missing,
    /// otherwise overwritten wholesale; an omitted detail is left alone.
    pub async fn update(&self, id: DbId, request: &BookRequest) -> CoreResult<BookView> {
        let mut tx = self.store.begin().await?;

        let mut book = tx
            .find_book_for_update(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Book", "id", id))?;

        if book.isbn != request.isbn && tx.isbn_exists(&request.isbn).await? {
            return Err(CoreError::IsbnDuplicate {
                isbn: request.isbn.clone(),
            });
        }
        if let Some(publisher_id) = request.publisher_id {
            ensure_publisher_exists(&mut tx, publisher_id).await?;
        }

        book.replace_with(request);
        tx.save_book(&book)
            .await
            .map_err(|e| book_write_error(e, &request.isbn, request.publisher_id))?;
        if let Some(fields) = &request.detail {
            tx.save_detail(id, fields).await?;
        }

        let view = self.finish(tx, id, &request.isbn, request.publisher_id).await?;
        tracing::info!(book_id = id, isbn = %view.book.isbn, "Book updated");
        Ok(view)
    }

    /// Apply only the fields the patch supplies.
    ///
    /// A detail patch on a book without a detail first creates an empty
    /// detail, then merges into it.
    pub async fn partial_update(&self, id: DbId, patch: &BookPatch) -> CoreResult<BookView> {
        let mut tx = self.store.begin().await?;

        let mut book = tx
            .find_book_for_update(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Book", "id", id))?;

        if let Some(isbn) = &patch.isbn {
            if *isbn != book.isbn && tx.isbn_exists(isbn).await? {
                return Err(CoreError::IsbnDuplicate { isbn: isbn.clone() });
            }
        }
        if let Some(publisher_id) = patch.publisher_id {
            ensure_publisher_exists(&mut tx, publisher_id).await?;
        }

        book.apply_patch(patch);
        tx.save_book(&book)
            .await
            .map_err(|e| book_write_error(e, &book.isbn, book.publisher_id))?;

        if let Some(detail_patch) = &patch.detail {
            let mut fields = tx
                .find_detail(id)
                .await?
                .map(|detail| detail.fields)
                .unwrap_or_default();
            fields.merge(detail_patch);
            tx.save_detail(id, &fields).await?;
        }

        let view = self.finish(tx, id, &book.isbn, book.publisher_id).await?;
        tracing::info!(book_id = id, "Book patched");
        Ok(view)
    }

    /// Permanently remove a book; its detail goes with it.
    pub async fn delete(&self, id: DbId) -> CoreResult<()> {
        let mut tx = self.store.begin().await?;

        if !tx.book_exists(id).await? {
            return Err(CoreError::not_found("Book", "id", id));
        }
        tx.delete_book(id).await?;
        tx.commit().await?;

        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    /// Re-read the written book with its relations, then commit.
    async fn finish(
        &self,
        mut tx: S::Tx,
        id: DbId,
        isbn: &str,
        publisher_id: Option<DbId>,
    ) -> CoreResult<BookView> {
        let view = tx
            .fetch_book_view(id)
            .await?
            .ok_or_else(|| CoreError::Internal(format!("book {id} missing after write")))?;
        tx.commit()
            .await
            .map_err(|e| book_write_error(e, isbn, publisher_id))?;
        Ok(view)
    }
}
