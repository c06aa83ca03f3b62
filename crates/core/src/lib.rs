//! Domain core of the bookshelf catalog.
//!
//! Holds the entity model, the error taxonomy, the repository contracts a
//! storage backend must satisfy, and the Book / Publisher services that
//! enforce the catalog invariants on top of them. Nothing in this crate
//! knows about HTTP or SQL.

pub mod book;
pub mod error;
pub mod memory;
pub mod publisher;
pub mod repository;
pub mod services;
pub mod types;
pub mod validation;
