// src/models/product.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A catalog entry. Immutable from the storefront's perspective; rows are
/// managed by an external admin surface. `price_cents` is the authoritative
/// unit price and is never taken from a client payload.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: i32,
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i64,
  pub image_url: String,
  pub category: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
