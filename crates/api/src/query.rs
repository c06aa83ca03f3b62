//! Query parameter types for the search endpoints.

use serde::Deserialize;

/// `?author=` on `/books/search/author`. A missing parameter searches for the
/// empty fragment, which matches every book.
#[derive(Debug, Deserialize)]
pub struct AuthorQuery {
    #[serde(default)]
    pub author: String,
}

/// `?title=` on `/books/search/title`.
#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    #[serde(default)]
    pub title: String,
}
