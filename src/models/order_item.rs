// src/models/order_item.rs

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted order line. `price_cents` is the unit price frozen at the time
/// the order was placed (or last edited), decoupled from later catalog
/// changes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: i32,
  pub quantity: i32,
  pub price_cents: i64,
}

/// Row shape for the order detail view: line item joined with the product
/// table for denormalized display fields. Price still comes from the frozen
/// order-item copy.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItemDetail {
  pub product_id: i32,
  pub product_name: String,
  pub image_url: String,
  pub quantity: i32,
  pub price_cents: i64,
}
