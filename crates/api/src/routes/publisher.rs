//! Route definitions for the `/publishers` resource.

use axum::routing::get;
use axum::Router;
use bookshelf_core::repository::CatalogStore;

use crate::handlers::publisher;
use crate::state::AppState;

/// Routes mounted at `/publishers`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> update
/// DELETE /{id}                -> delete
/// GET    /{id}/books          -> list_books
/// GET    /name/{name}         -> get_by_name
/// ```
pub fn router<S: CatalogStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(publisher::list::<S>).post(publisher::create::<S>))
        .route(
            "/{id}",
            get(publisher::get_by_id::<S>)
                .put(publisher::update::<S>)
                .delete(publisher::delete::<S>),
        )
        .route("/{id}/books", get(publisher::list_books::<S>))
        .route("/name/{name}", get(publisher::get_by_name::<S>))
}
