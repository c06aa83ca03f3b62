//! Repository for the `publishers` table.

use bookshelf_core::publisher::PublisherRequest;
use bookshelf_core::types::DbId;
use sqlx::PgConnection;

use crate::models::publisher::PublisherRow;

const COLUMNS: &str = "id, name, established_date, address, created_at, updated_at";

pub struct PublisherRepo;

impl PublisherRepo {
    pub async fn create(
        conn: &mut PgConnection,
        input: &PublisherRequest,
    ) -> Result<PublisherRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO publishers (name, established_date, address)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PublisherRow>(&query)
            .bind(&input.name)
            .bind(input.established_date)
            .bind(&input.address)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<PublisherRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM publishers WHERE id = $1");
        sqlx::query_as::<_, PublisherRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn find_by_name(
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Option<PublisherRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM publishers WHERE name = $1");
        sqlx::query_as::<_, PublisherRow>(&query)
            .bind(name)
            .fetch_optional(conn)
            .await
    }

    /// List all publishers in insertion order.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<PublisherRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM publishers ORDER BY id ASC");
        sqlx::query_as::<_, PublisherRow>(&query)
            .fetch_all(conn)
            .await
    }

    pub async fn list_by_ids(
        conn: &mut PgConnection,
        ids: &[DbId],
    ) -> Result<Vec<PublisherRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM publishers WHERE id = ANY($1) ORDER BY id ASC");
        sqlx::query_as::<_, PublisherRow>(&query)
            .bind(ids)
            .fetch_all(conn)
            .await
    }

    pub async fn exists(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM publishers WHERE id = $1)")
            .bind(id)
            .fetch_one(conn)
            .await
    }

    pub async fn exists_by_name(conn: &mut PgConnection, name: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM publishers WHERE name = $1)")
            .bind(name)
            .fetch_one(conn)
            .await
    }

    /// Overwrite name, established date and address.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &PublisherRequest,
    ) -> Result<PublisherRow, sqlx::Error> {
        let query = format!(
            "UPDATE publishers SET
                name = $2,
                established_date = $3,
                address = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PublisherRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.established_date)
            .bind(&input.address)
            .fetch_one(conn)
            .await
    }

    /// Delete a publisher. Rejected by `fk_books_publisher_id` while any
    /// book still references it.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
