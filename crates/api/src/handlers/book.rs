//! Handlers for the `/books` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bookshelf_core::book::{BookDetailFields, BookPatch, BookRequest, BookView};
use bookshelf_core::repository::CatalogStore;
use bookshelf_core::types::DbId;
use bookshelf_core::validation::{validate_book_patch, validate_book_request, validate_detail};

use crate::error::AppResult;
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::query::{AuthorQuery, TitleQuery};
use crate::state::AppState;

/// GET /api/v1/books
pub async fn list<S: CatalogStore>(
    State(state): State<AppState<S>>,
) -> AppResult<Json<Vec<BookView>>> {
    Ok(Json(state.books.list_all().await?))
}

/// GET /api/v1/books/{id}
pub async fn get_by_id<S: CatalogStore>(
    State(state): State<AppState<S>>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<BookView>> {
    Ok(Json(state.books.get_by_id(id).await?))
}

/// GET /api/v1/books/isbn/{isbn}
pub async fn get_by_isbn<S: CatalogStore>(
    State(state): State<AppState<S>>,
    PathParam(isbn): PathParam<String>,
) -> AppResult<Json<BookView>> {
    Ok(Json(state.books.get_by_isbn(&isbn).await?))
}

/// GET /api/v1/books/search/author?author=
pub async fn search_by_author<S: CatalogStore>(
    State(state): State<AppState<S>>,
    QueryParams(params): QueryParams<AuthorQuery>,
) -> AppResult<Json<Vec<BookView>>> {
    Ok(Json(state.books.search_by_author(&params.author).await?))
}

/// GET /api/v1/books/search/title?title=
pub async fn search_by_title<S: CatalogStore>(
    State(state): State<AppState<S>>,
    QueryParams(params): QueryParams<TitleQuery>,
) -> AppResult<Json<Vec<BookView>>> {
    Ok(Json(state.books.search_by_title(&params.title).await?))
}

/// POST /api/v1/books
pub async fn create<S: CatalogStore>(
    State(state): State<AppState<S>>,
    JsonBody(input): JsonBody<BookRequest>,
) -> AppResult<(StatusCode, Json<BookView>)> {
    validate_book_request(&input)?;
    let book = state.books.create(&input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /api/v1/books/{id}
pub async fn update<S: CatalogStore>(
    State(state): State<AppState<S>>,
    PathParam(id): PathParam<DbId>,
    JsonBody(input): JsonBody<BookRequest>,
) -> AppResult<Json<BookView>> {
    validate_book_request(&input)?;
    Ok(Json(state.books.update(id, &input).await?))
}

/// PATCH /api/v1/books/{id}
pub async fn patch<S: CatalogStore>(
    State(state): State<AppState<S>>,
    PathParam(id): PathParam<DbId>,
    JsonBody(input): JsonBody<BookPatch>,
) -> AppResult<Json<BookView>> {
    validate_book_patch(&input)?;
    Ok(Json(state.books.partial_update(id, &input).await?))
}

/// PATCH /api/v1/books/{id}/detail
///
/// The body is the detail object itself, merged field by field.
pub async fn patch_detail<S: CatalogStore>(
    State(state): State<AppState<S>>,
    PathParam(id): PathParam<DbId>,
    JsonBody(input): JsonBody<BookDetailFields>,
) -> AppResult<Json<BookView>> {
    validate_detail(&input)?;
    let patch = BookPatch::detail_only(input);
    Ok(Json(state.books.partial_update(id, &patch).await?))
}

/// DELETE /api/v1/books/{id}
pub async fn delete<S: CatalogStore>(
    State(state): State<AppState<S>>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<StatusCode> {
    state.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
