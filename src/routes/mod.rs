use axum::{Router, http::Uri, routing::get};

use crate::{error::AppError, state::AppState};

pub mod admin;
pub mod auth;
pub mod doc;
pub mod health;
pub mod params;
pub mod vendor;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/vendor", vendor::router())
}

/// Health check, `/api`, docs and the JSON 404 fallback, bound to `state`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "no route matched");
    AppError::NotFound("Route not found")
}
