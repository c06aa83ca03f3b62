//! Publisher service: CRUD plus the delete guard and the live book count.

use crate::book::BookView;
use crate::error::{CoreError, CoreResult};
use crate::publisher::{Publisher, PublisherRequest, PublisherSummary, PublisherView};
use crate::repository::{
    BookRepository, CatalogStore, CatalogTx, PublisherRepository, StoreError, BOOK_PUBLISHER_FK,
};
use crate::types::DbId;

use super::{ensure_publisher_exists, publisher_write_error};

/// Create, read, update and delete publishers.
#[derive(Debug, Clone)]
pub struct PublisherService<S> {
    store: S,
}

impl<S: CatalogStore> PublisherService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every publisher with the number of books currently referencing it.
    pub async fn list_all(&self) -> CoreResult<Vec<PublisherSummary>> {
        let mut tx = self.store.begin_read().await?;
        let publishers = tx.list_publishers().await?;

        let mut summaries = Vec::with_capacity(publishers.len());
        for publisher in publishers {
            let book_count = tx.count_books_by_publisher(publisher.id).await?;
            summaries.push(PublisherSummary {
                publisher,
                book_count,
            });
        }
        Ok(summaries)
    }

    pub async fn get_by_id(&self, id: DbId) -> CoreResult<PublisherView> {
        let mut tx = self.store.begin_read().await?;
        let publisher = tx
            .find_publisher(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Publisher", "id", id))?;
        with_books(&mut tx, publisher).await
    }

    pub async fn get_by_name(&self, name: &str) -> CoreResult<PublisherView> {
        let mut tx = self.store.begin_read().await?;
        let publisher = tx
            .find_publisher_by_name(name)
            .await?
            .ok_or_else(|| CoreError::not_found("Publisher", "name", name))?;
        with_books(&mut tx, publisher).await
    }

    /// Books referencing the publisher. Empty when it has none.
    pub async fn list_books_of(&self, publisher_id: DbId) -> CoreResult<Vec<BookView>> {
        let mut tx = self.store.begin_read().await?;
        ensure_publisher_exists(&mut tx, publisher_id).await?;
        let books = tx.list_books_by_publisher(publisher_id).await?;
        Ok(tx.attach_relations(books).await?)
    }

    pub async fn create(&self, request: &PublisherRequest) -> CoreResult<PublisherView> {
        let mut tx = self.store.begin().await?;

        if tx.publisher_name_exists(&request.name).await? {
            return Err(CoreError::PublisherNameDuplicate {
                name: request.name.clone(),
            });
        }

        let publisher = tx
            .insert_publisher(request)
            .await
            .map_err(|e| publisher_write_error(e, &request.name))?;
        tx.commit()
            .await
            .map_err(|e| publisher_write_error(e, &request.name))?;

        tracing::info!(publisher_id = publisher.id, name = %publisher.name, "Publisher created");
        Ok(PublisherView {
            publisher,
            books: Vec::new(),
        })
    }

    /// Overwrite name, established date and address.
    ///
    /// Keeping the current name is never a conflict.
    pub async fn update(&self, id: DbId, request: &PublisherRequest) -> CoreResult<PublisherView> {
        let mut tx = self.store.begin().await?;

        let mut publisher = tx
            .find_publisher(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Publisher", "id", id))?;

        if publisher.name != request.name && tx.publisher_name_exists(&request.name).await? {
            return Err(CoreError::PublisherNameDuplicate {
                name: request.name.clone(),
            });
        }

        publisher.replace_with(request);
        let publisher = tx
            .save_publisher(&publisher)
            .await
            .map_err(|e| publisher_write_error(e, &request.name))?;
        let view = with_books(&mut tx, publisher).await?;
        tx.commit()
            .await
            .map_err(|e| publisher_write_error(e, &request.name))?;

        tracing::info!(publisher_id = id, name = %view.publisher.name, "Publisher updated");
        Ok(view)
    }

    /// Delete a publisher that no book references. Books are never cascaded.
    pub async fn delete(&self, id: DbId) -> CoreResult<()> {
        let mut tx = self.store.begin().await?;

        ensure_publisher_exists(&mut tx, id).await?;

        let book_count = tx.count_books_by_publisher(id).await?;
        if book_count > 0 {
            tracing::warn!(publisher_id = id, book_count, "Refusing to delete publisher with books");
            return Err(CoreError::PublisherHasBooks { id, book_count });
        }

        let deleted = tx.delete_publisher(id).await;
        match deleted {
            Ok(_) => tx.commit().await?,
            Err(StoreError::ForeignKeyViolation(constraint)) if constraint == BOOK_PUBLISHER_FK => {
                // A book was linked after the count; report what is there now.
                drop(tx);
                let mut tx = self.store.begin_read().await?;
                let book_count = tx.count_books_by_publisher(id).await?;
                tracing::warn!(publisher_id = id, book_count, "Publisher gained books during delete");
                return Err(CoreError::PublisherHasBooks { id, book_count });
            }
            Err(other) => return Err(other.into()),
        }

        tracing::info!(publisher_id = id, "Publisher deleted");
        Ok(())
    }
}

async fn with_books<T: CatalogTx>(tx: &mut T, publisher: Publisher) -> CoreResult<PublisherView> {
    let books = tx.list_books_by_publisher(publisher.id).await?;
    let books = tx.attach_relations(books).await?;
    Ok(PublisherView { publisher, books })
}
