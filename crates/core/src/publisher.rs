//! Publisher entity model and DTOs.

use serde::{Deserialize, Serialize};

use crate::book::BookView;
use crate::types::{Date, DbId, Timestamp};

/// A row from the `publishers` table.
///
/// A publisher has no stored list of books; the relation is derived from
/// `books.publisher_id` on every read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Publisher {
    pub id: DbId,
    /// Unique across all publishers (`uq_publishers_name`).
    pub name: String,
    pub established_date: Option<Date>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating or updating a publisher.
///
/// Update is a full replace: omitted optional fields are cleared.
#[derive(Debug, Clone, Deserialize)]
pub struct PublisherRequest {
    pub name: String,
    pub established_date: Option<Date>,
    pub address: Option<String>,
}

impl Publisher {
    pub fn replace_with(&mut self, request: &PublisherRequest) {
        self.name = request.name.clone();
        self.established_date = request.established_date;
        self.address = request.address.clone();
    }
}

/// Compact publisher reference embedded in book views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublisherRef {
    pub id: DbId,
    pub name: String,
}

impl From<&Publisher> for PublisherRef {
    fn from(publisher: &Publisher) -> Self {
        PublisherRef {
            id: publisher.id,
            name: publisher.name.clone(),
        }
    }
}

/// List entry: a publisher annotated with its live book count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublisherSummary {
    #[serde(flatten)]
    pub publisher: Publisher,
    pub book_count: i64,
}

/// A publisher with every book that references it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublisherView {
    #[serde(flatten)]
    pub publisher: Publisher,
    pub books: Vec<BookView>,
}
