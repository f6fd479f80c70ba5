use std::collections::BTreeMap;
use std::fmt;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::response::{ApiResponse, Meta};

/// Field-level validation failures collected at the request boundary.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Records the first message for `field`; later messages for the same field are dropped.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("{0}")]
    InvalidCredentials(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    InvalidState(&'static str),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation(FieldErrors::single(field, message))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidState(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable kind reported alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Unauthorized | AppError::InvalidCredentials(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::InvalidState(_) => "invalid_state",
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => "internal",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid_field("body", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::invalid_field("path", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::invalid_field("query", rejection.body_text())
    }
}

const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Serialize)]
pub struct ErrorData {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Validation(_) => "Validation failed".to_string(),
            AppError::DbError(err) => {
                tracing::error!(error = ?err, "database error");
                INTERNAL_MESSAGE.to_string()
            }
            AppError::OrmError(err) => {
                tracing::error!(error = ?err, "orm error");
                INTERNAL_MESSAGE.to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
                INTERNAL_MESSAGE.to_string()
            }
            _ => self.to_string(),
        };

        let kind = self.kind();
        let fields = match self {
            AppError::Validation(fields) => Some(fields),
            _ => None,
        };

        let body = ApiResponse {
            message,
            data: Some(ErrorData {
                error: kind,
                fields,
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(
            AppError::invalid_field("quantity", "must be positive").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("Admin only").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::NotFound("Product not found").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("User already exists").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidState("Product is not active").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn field_errors_keep_first_message_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("price", "must be positive");
        errors.add("price", "too many decimals");
        errors.add("name", "is required");

        assert_eq!(errors.get("price"), Some("must be positive"));
        assert_eq!(errors.to_string(), "name: is required; price: must be positive");
        assert!(errors.into_result().is_err());
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[tokio::test]
    async fn internal_errors_are_opaque() {
        let (status, body) =
            body_json(AppError::Internal(anyhow::anyhow!("relation \"users\" missing"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal Server Error");
        assert_eq!(body["data"]["error"], "internal");
        assert!(!body.to_string().contains("relation"));
    }

    #[tokio::test]
    async fn validation_errors_carry_fields() {
        let (status, body) = body_json(AppError::invalid_field("quantity", "must be positive")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["data"]["error"], "validation_error");
        assert_eq!(body["data"]["fields"]["quantity"], "must be positive");
    }
}
