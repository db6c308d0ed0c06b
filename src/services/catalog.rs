// src/services/catalog.rs

//! Read-only queries against the product catalog. The storefront never
//! mutates products; an external admin surface owns them.

use sqlx::{PgExecutor, PgPool};
use std::collections::HashMap;
use tracing::instrument;

use crate::errors::{AppError, Result};
use crate::models::Product;

/// Lists products, optionally filtered by exact category and/or a
/// case-insensitive name substring, ordered by name.
#[instrument(name = "catalog::list_products", skip(pool))]
pub async fn list_products(pool: &PgPool, category: Option<&str>, search: Option<&str>) -> Result<Vec<Product>> {
  let products = sqlx::query_as::<_, Product>(
    r#"
    SELECT id, name, description, price_cents, image_url, category, created_at, updated_at
    FROM products
    WHERE ($1::text IS NULL OR category = $1)
      AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
    ORDER BY name
    "#,
  )
  .bind(category)
  .bind(search)
  .fetch_all(pool)
  .await?;

  Ok(products)
}

#[instrument(name = "catalog::get_product", skip(pool))]
pub async fn get_product(pool: &PgPool, product_id: i32) -> Result<Product> {
  sqlx::query_as::<_, Product>(
    r#"
    SELECT id, name, description, price_cents, image_url, category, created_at, updated_at
    FROM products
    WHERE id = $1
    "#,
  )
  .bind(product_id)
  .fetch_optional(pool)
  .await?
  .ok_or(AppError::ProductNotFound(product_id))
}

/// Batch-resolves authoritative unit prices for the given product ids in one
/// read. Callers must check the map for every id they care about: ids without
/// a catalog row are simply absent here.
#[instrument(name = "catalog::price_map", skip(executor))]
pub async fn price_map<'e, E>(executor: E, product_ids: &[i32]) -> Result<HashMap<i32, i64>>
where
  E: PgExecutor<'e>,
{
  let rows: Vec<(i32, i64)> = sqlx::query_as("SELECT id, price_cents FROM products WHERE id = ANY($1)")
    .bind(product_ids)
    .fetch_all(executor)
    .await?;

  Ok(rows.into_iter().collect())
}
