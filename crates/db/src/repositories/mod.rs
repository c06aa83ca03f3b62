//! Per-table query modules.
//!
//! Each repo is a zero-sized struct whose async methods take the connection
//! to run on, so the same query can run on a pooled connection or inside an
//! open transaction.

pub mod book_detail_repo;
pub mod book_repo;
pub mod publisher_repo;

pub use book_detail_repo::BookDetailRepo;
pub use book_repo::BookRepo;
pub use publisher_repo::PublisherRepo;
