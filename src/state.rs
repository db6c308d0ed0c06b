// src/state.rs
use crate::cart::CartRegistry;
use crate::config::AppConfig;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub carts: Arc<CartRegistry>,
  pub config: Arc<AppConfig>,
}
