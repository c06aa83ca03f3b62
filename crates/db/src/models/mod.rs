//! Row types mapped with `sqlx::FromRow`, converted into the core model.

pub mod book;
pub mod publisher;
