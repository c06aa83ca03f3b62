//! Handlers for the `/publishers` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bookshelf_core::book::BookView;
use bookshelf_core::publisher::{PublisherRequest, PublisherSummary, PublisherView};
use bookshelf_core::repository::CatalogStore;
use bookshelf_core::types::DbId;
use bookshelf_core::validation::validate_publisher_request;

use crate::error::AppResult;
use crate::extract::{JsonBody, PathParam};
use crate::state::AppState;

/// GET /api/v1/publishers
pub async fn list<S: CatalogStore>(
    State(state): State<AppState<S>>,
) -> AppResult<Json<Vec<PublisherSummary>>> {
    Ok(Json(state.publishers.list_all().await?))
}

/// GET /api/v1/publishers/{id}
pub async fn get_by_id<S: CatalogStore>(
    State(state): State<AppState<S>>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<PublisherView>> {
    Ok(Json(state.publishers.get_by_id(id).await?))
}

/// GET /api/v1/publishers/name/{name}
pub async fn get_by_name<S: CatalogStore>(
    State(state): State<AppState<S>>,
    PathParam(name): PathParam<String>,
) -> AppResult<Json<PublisherView>> {
    Ok(Json(state.publishers.get_by_name(&name).await?))
}

/// GET /api/v1/publishers/{id}/books
pub async fn list_books<S: CatalogStore>(
    State(state): State<AppState<S>>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<Vec<BookView>>> {
    Ok(Json(state.publishers.list_books_of(id).await?))
}

/// POST /api/v1/publishers
pub async fn create<S: CatalogStore>(
    State(state): State<AppState<S>>,
    JsonBody(input): JsonBody<PublisherRequest>,
) -> AppResult<(StatusCode, Json<PublisherView>)> {
    validate_publisher_request(&input)?;
    let publisher = state.publishers.create(&input).await?;
    Ok((StatusCode::CREATED, Json(publisher)))
}

/// PUT /api/v1/publishers/{id}
pub async fn update<S: CatalogStore>(
    State(state): State<AppState<S>>,
    PathParam(id): PathParam<DbId>,
    JsonBody(input): JsonBody<PublisherRequest>,
) -> AppResult<Json<PublisherView>> {
    validate_publisher_request(&input)?;
    Ok(Json(state.publishers.update(id, &input).await?))
}

/// DELETE /api/v1/publishers/{id}
///
/// Refused with 409 while any book references the publisher.
pub async fn delete<S: CatalogStore>(
    State(state): State<AppState<S>>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<StatusCode> {
    state.publishers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
