//! Route definitions for the `/books` resource.

use axum::routing::{get, patch};
use axum::Router;
use bookshelf_core::repository::CatalogStore;

use crate::handlers::book;
use crate::state::AppState;

/// Routes mounted at `/books`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> update
/// PATCH  /{id}                -> patch
/// DELETE /{id}                -> delete
/// PATCH  /{id}/detail         -> patch_detail
/// GET    /isbn/{isbn}         -> get_by_isbn
/// GET    /search/author       -> search_by_author
/// GET    /search/title        -> search_by_title
/// ```
pub fn router<S: CatalogStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(book::list::<S>).post(book::create::<S>))
        .route(
            "/{id}",
            get(book::get_by_id::<S>)
                .put(book::update::<S>)
                .patch(book::patch::<S>)
                .delete(book::delete::<S>),
        )
        .route("/{id}/detail", patch(book::patch_detail::<S>))
        .route("/isbn/{isbn}", get(book::get_by_isbn::<S>))
        .route("/search/author", get(book::search_by_author::<S>))
        .route("/search/title", get(book::search_by_title::<S>))
}
