//! Rows from the `publishers` table.

use bookshelf_core::publisher::Publisher;
use bookshelf_core::types::{Date, DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PublisherRow {
    pub id: DbId,
    pub name: String,
    pub established_date: Option<Date>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PublisherRow> for Publisher {
    fn from(row: PublisherRow) -> Self {
        Publisher {
            id: row.id,
            name: row.name,
            established_date: row.established_date,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
