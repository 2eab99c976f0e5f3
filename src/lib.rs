pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;

/// Shared router state: immutable configuration plus the storage pool, both
/// constructed once in `main` and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: PgPool,
}
