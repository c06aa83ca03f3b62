//! Request validation helpers.
//!
//! Called by the HTTP boundary before a request reaches a service. Every
//! failure is a [`CoreError::Validation`] naming the offending field.

use crate::book::{BookDetailFields, BookPatch, BookRequest};
use crate::error::CoreError;
use crate::publisher::PublisherRequest;

fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: i32) -> Result<(), CoreError> {
    if value < 0 {
        return Err(CoreError::Validation(format!(
            "{field} must be zero or greater (got {value})"
        )));
    }
    Ok(())
}

pub fn validate_detail(detail: &BookDetailFields) -> Result<(), CoreError> {
    if let Some(pages) = detail.page_count {
        require_non_negative("page_count", pages)?;
    }
    Ok(())
}

/// Validate a create / full-update request.
pub fn validate_book_request(request: &BookRequest) -> Result<(), CoreError> {
    require_non_blank("title", &request.title)?;
    require_non_blank("author", &request.author)?;
    require_non_blank("isbn", &request.isbn)?;
    require_non_negative("price", request.price)?;
    if let Some(detail) = &request.detail {
        validate_detail(detail)?;
    }
    Ok(())
}

/// Validate a partial update. Only supplied fields are checked.
pub fn validate_book_patch(patch: &BookPatch) -> Result<(), CoreError> {
    if let Some(title) = &patch.title {
        require_non_blank("title", title)?;
    }
    if let Some(author) = &patch.author {
        require_non_blank("author", author)?;
    }
    if let Some(isbn) = &patch.isbn {
        require_non_blank("isbn", isbn)?;
    }
    if let Some(price) = patch.price {
        require_non_negative("price", price)?;
    }
    if let Some(detail) = &patch.detail {
        validate_detail(detail)?;
    }
    Ok(())
}

pub fn validate_publisher_request(request: &PublisherRequest) -> Result<(), CoreError> {
    require_non_blank("name", &request.name)
}
