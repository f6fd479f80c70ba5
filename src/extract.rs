//! Extractors whose rejections are reported through [`AppError`] instead of axum's plain-text
//! defaults, so malformed input always produces the JSON validation envelope.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Database ids are positive; anything else is rejected before storage is touched.
pub fn positive_id(field: &str, id: i64) -> Result<i64, AppError> {
    if id <= 0 {
        return Err(AppError::invalid_field(field, "must be a positive integer"));
    }
    Ok(id)
}
