use std::path::PathBuf;

use chrono::Duration;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
    security::TokenService,
};

/// Everything a request handler needs, constructed once and injected through axum state.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub tokens: TokenService,
    pub invoice_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(pool: DbPool, config: &AppConfig) -> Self {
        let orm = orm_from_pool(&pool);
        let tokens = TokenService::new(
            config.jwt_secret.as_bytes(),
            Duration::hours(config.token_ttl_hours),
        );
        Self {
            pool,
            orm,
            tokens,
            invoice_dir: config.invoice_dir.clone(),
        }
    }
}
