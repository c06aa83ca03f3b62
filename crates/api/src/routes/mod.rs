pub mod book;
pub mod health;
pub mod publisher;

use axum::Router;
use bookshelf_core::repository::CatalogStore;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /books                          list, create
/// /books/{id}                     get, replace, patch, delete
/// /books/{id}/detail              patch detail
/// /books/isbn/{isbn}              get by ISBN
/// /books/search/author?author=    search by author
/// /books/search/title?title=      search by title
///
/// /publishers                     list (with book counts), create
/// /publishers/{id}                get (with books), replace, delete
/// /publishers/{id}/books          books of a publisher
/// /publishers/name/{name}         get by name
/// ```
pub fn api_routes<S: CatalogStore>() -> Router<AppState<S>> {
    Router::new()
        .nest("/books", book::router::<S>())
        .nest("/publishers", publisher::router::<S>())
}
