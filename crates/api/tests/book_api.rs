//! HTTP-level integration tests for the `/books` endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_book, create_publisher, delete, get, patch_json, post_json, put_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_book_returns_201_with_detail_and_publisher() {
    let app = common::build_test_app();
    let publisher_id = create_publisher(&app, "Prentice Hall").await;

    let response = post_json(
        &app,
        "/api/v1/books",
        json!({
            "title": "Clean Code",
            "author": "Robert Martin",
            "isbn": "978-0132350884",
            "price": 3500,
            "publish_date": "2008-08-01",
            "publisher_id": publisher_id,
            "detail": { "language": "en", "page_count": 464 }
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["id"].is_number());
    assert_eq!(json["title"], "Clean Code");
    assert_eq!(json["publish_date"], "2008-08-01");
    assert_eq!(json["detail"]["language"], "en");
    assert_eq!(json["detail"]["page_count"], 464);
    assert_eq!(json["detail"]["book_id"], json["id"]);
    assert_eq!(json["publisher"]["id"], publisher_id);
    assert_eq!(json["publisher"]["name"], "Prentice Hall");
}

#[tokio::test]
async fn create_without_detail_has_null_detail() {
    let app = common::build_test_app();
    let id = create_book(&app, "111", None).await;

    let json = body_json(get(&app, &format!("/api/v1/books/{id}")).await).await;
    assert!(json["detail"].is_null());
    assert!(json["publisher"].is_null());
}

#[tokio::test]
async fn duplicate_isbn_returns_409() {
    let app = common::build_test_app();
    create_book(&app, "111", None).await;

    let response = post_json(
        &app,
        "/api/v1/books",
        json!({ "title": "Other", "author": "Someone", "isbn": "111", "price": 10 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ISBN_DUPLICATE");
    assert_eq!(json["error"], "Book already exists with ISBN: 111");
}

#[tokio::test]
async fn create_with_unknown_publisher_returns_404() {
    let app = common::build_test_app();
    let response = post_json(
        &app,
        "/api/v1/books",
        json!({ "title": "T", "author": "A", "isbn": "111", "price": 10, "publisher_id": 77 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "RESOURCE_NOT_FOUND");
    assert_eq!(json["error"], "Publisher not found with id: 77");

    assert!(body_json(get(&app, "/api/v1/books").await)
        .await
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn invalid_fields_return_400() {
    let app = common::build_test_app();

    let response = post_json(
        &app,
        "/api/v1/books",
        json!({ "title": "  ", "author": "A", "isbn": "111", "price": 10 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json(
        &app,
        "/api/v1/books",
        json!({ "title": "T", "author": "A", "isbn": "111", "price": -1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_returns_400_json() {
    let app = common::build_test_app();
    let response = post_json(&app, "/api/v1/books", json!({ "title": "No price" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_missing_book_returns_404_with_message() {
    let app = common::build_test_app();
    let response = get(&app, "/api/v1/books/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "RESOURCE_NOT_FOUND");
    assert_eq!(json["error"], "Book not found with id: 999");
}

#[tokio::test]
async fn get_by_isbn() {
    let app = common::build_test_app();
    let id = create_book(&app, "978-1", None).await;

    let response = get(&app, "/api/v1/books/isbn/978-1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], id);

    let response = get(&app, "/api/v1/books/isbn/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Book not found with ISBN: nope"
    );
}

#[tokio::test]
async fn list_returns_every_book() {
    let app = common::build_test_app();
    create_book(&app, "1", None).await;
    create_book(&app, "2", None).await;

    let response = get(&app, "/api/v1/books").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn search_is_case_insensitive_and_empty_when_nothing_matches() {
    let app = common::build_test_app();
    post_json(
        &app,
        "/api/v1/books",
        json!({ "title": "The Rust Book", "author": "Steve Klabnik", "isbn": "1", "price": 0 }),
    )
    .await;
    post_json(
        &app,
        "/api/v1/books",
        json!({ "title": "Dune", "author": "Frank Herbert", "isbn": "2", "price": 0 }),
    )
    .await;

    let json = body_json(get(&app, "/api/v1/books/search/title?title=rUsT").await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["title"], "The Rust Book");

    let json = body_json(get(&app, "/api/v1/books/search/author?author=HERB").await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["author"], "Frank Herbert");

    let response = get(&app, "/api/v1/books/search/author?author=tolkien").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Update / patch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn put_replaces_fields_and_unlinks_publisher_when_omitted() {
    let app = common::build_test_app();
    let publisher_id = create_publisher(&app, "Acme").await;
    let id = create_book(&app, "111", Some(publisher_id)).await;

    let response = put_json(
        &app,
        &format!("/api/v1/books/{id}"),
        json!({ "title": "New", "author": "Other", "isbn": "111", "price": 5 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "New");
    assert_eq!(json["price"], 5);
    assert!(json["publisher_id"].is_null());
    assert!(json["publisher"].is_null());
}

#[tokio::test]
async fn put_to_taken_isbn_returns_409() {
    let app = common::build_test_app();
    create_book(&app, "111", None).await;
    let id = create_book(&app, "222", None).await;

    let response = put_json(
        &app,
        &format!("/api/v1/books/{id}"),
        json!({ "title": "T", "author": "A", "isbn": "111", "price": 5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(get(&app, &format!("/api/v1/books/{id}")).await).await;
    assert_eq!(json["isbn"], "222");
}

#[tokio::test]
async fn put_missing_book_returns_404() {
    let app = common::build_test_app();
    let response = put_json(
        &app,
        "/api/v1/books/5",
        json!({ "title": "T", "author": "A", "isbn": "1", "price": 5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_changes_only_supplied_fields() {
    let app = common::build_test_app();
    let id = create_book(&app, "111", None).await;

    let response = patch_json(
        &app,
        &format!("/api/v1/books/{id}"),
        json!({ "price": 4200, "title": null }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["price"], 4200);
    assert_eq!(json["title"], "Clean Code");
    assert_eq!(json["author"], "Robert Martin");
    assert_eq!(json["isbn"], "111");
}

#[tokio::test]
async fn patch_merges_nested_detail() {
    let app = common::build_test_app();
    let response = post_json(
        &app,
        "/api/v1/books",
        json!({
            "title": "T", "author": "A", "isbn": "1", "price": 1,
            "detail": { "description": "first", "language": "en" }
        }),
    )
    .await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let json = body_json(
        patch_json(
            &app,
            &format!("/api/v1/books/{id}"),
            json!({ "detail": { "page_count": 300 } }),
        )
        .await,
    )
    .await;

    assert_eq!(json["detail"]["description"], "first");
    assert_eq!(json["detail"]["language"], "en");
    assert_eq!(json["detail"]["page_count"], 300);
}

#[tokio::test]
async fn patch_detail_endpoint_creates_missing_detail() {
    let app = common::build_test_app();
    let id = create_book(&app, "111", None).await;

    let response = patch_json(
        &app,
        &format!("/api/v1/books/{id}/detail"),
        json!({ "edition": "2nd" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["detail"]["edition"], "2nd");
    assert!(json["detail"]["language"].is_null());
}

#[tokio::test]
async fn patch_with_negative_page_count_returns_400() {
    let app = common::build_test_app();
    let id = create_book(&app, "111", None).await;

    let response = patch_json(
        &app,
        &format!("/api/v1/books/{id}/detail"),
        json!({ "page_count": -3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_returns_204_then_404() {
    let app = common::build_test_app();
    let id = create_book(&app, "111", None).await;

    let response = delete(&app, &format!("/api/v1/books/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &format!("/api/v1/books/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(&app, &format!("/api/v1/books/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_isbn_can_be_reused() {
    let app = common::build_test_app();
    let id = create_book(&app, "111", None).await;
    delete(&app, &format!("/api/v1/books/{id}")).await;

    create_book(&app, "111", None).await;
}
