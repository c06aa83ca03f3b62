pub mod book;
pub mod publisher;
