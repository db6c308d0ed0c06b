// src/services/orders.rs

//! The order lifecycle: create, edit, cancel, and the owner-scoped read
//! paths. All mutations recompute money from authoritative catalog prices and
//! commit order row and item rows in a single transaction. Edits and cancels
//! take a row-level lock on the order (`SELECT ... FOR UPDATE`) so racing
//! mutations on the same order serialize and re-check the status gate.

use serde::Deserialize;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{Order, OrderItem, OrderItemDetail, OrderStatus};
use crate::services::catalog;

/// One requested order line. Deliberately carries no price field: any price a
/// client includes in the JSON body is dropped during deserialization, never
/// read.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineInput {
  pub product_id: i32,
  pub quantity: i32,
}

/// A line after re-pricing against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
  pub product_id: i32,
  pub quantity: i32,
  pub price_cents: i64,
}

/// Rejects an empty list, non-positive quantities, and duplicate product ids
/// (the cart aggregates to one line per product; a duplicate here means a
/// malformed request).
pub fn validate_items(items: &[OrderLineInput]) -> Result<()> {
  if items.is_empty() {
    return Err(AppError::InvalidInput("Order must contain at least one item.".to_string()));
  }
  let mut seen = HashSet::new();
  for item in items {
    if item.quantity < 1 {
      return Err(AppError::InvalidInput(format!(
        "Quantity for product {} must be at least 1.",
        item.product_id
      )));
    }
    if !seen.insert(item.product_id) {
      return Err(AppError::InvalidInput(format!(
        "Product {} appears more than once.",
        item.product_id
      )));
    }
  }
  Ok(())
}

/// Prices every line strictly from the looked-up catalog prices and returns
/// the lines together with the order total. Fails with `ProductNotFound` when
/// any referenced id is missing from the map.
pub fn price_lines(items: &[OrderLineInput], prices: &HashMap<i32, i64>) -> Result<(Vec<PricedLine>, i64)> {
  let mut lines = Vec::with_capacity(items.len());
  let mut total: i64 = 0;
  for item in items {
    let price_cents = *prices
      .get(&item.product_id)
      .ok_or(AppError::ProductNotFound(item.product_id))?;
    total += price_cents * item.quantity as i64;
    lines.push(PricedLine {
      product_id: item.product_id,
      quantity: item.quantity,
      price_cents,
    });
  }
  Ok((lines, total))
}

/// Converts a cart snapshot into a persisted order plus item rows. The order
/// row and all item rows commit in one transaction; any failure rolls back
/// everything, so no valid-looking empty order can survive a partial write.
#[instrument(name = "orders::create_order", skip(pool, items), fields(user_id = %user_id, item_count = items.len()))]
pub async fn create_order(pool: &PgPool, user_id: Uuid, items: &[OrderLineInput]) -> Result<Uuid> {
  validate_items(items)?;

  let product_ids: Vec<i32> = items.iter().map(|i| i.product_id).collect();
  let prices = catalog::price_map(pool, &product_ids).await?;
  let (lines, total_cents) = price_lines(items, &prices)?;

  let order_id = Uuid::new_v4();
  let mut tx = pool.begin().await?;

  sqlx::query("INSERT INTO orders (id, user_id, status, total_cents) VALUES ($1, $2, $3, $4)")
    .bind(order_id)
    .bind(user_id)
    .bind(OrderStatus::Pending)
    .bind(total_cents)
    .execute(&mut *tx)
    .await?;

  insert_items(&mut tx, order_id, &lines).await?;

  tx.commit().await?;
  info!(order_id = %order_id, total_cents, "Order created.");
  Ok(order_id)
}

/// Replaces a pending order's item set with `items` (full-replacement
/// semantics, not a diff), re-pricing every line from the catalog and
/// persisting the recomputed total. Returns the new total.
#[instrument(name = "orders::update_order", skip(pool, items), fields(user_id = %user_id, order_id = %order_id))]
pub async fn update_order(pool: &PgPool, user_id: Uuid, order_id: Uuid, items: &[OrderLineInput]) -> Result<i64> {
  validate_items(items)?;

  let mut tx = pool.begin().await?;

  let order = lock_owned_order(&mut tx, user_id, order_id).await?;
  if !order.status.is_pending() {
    return Err(AppError::OrderNotEditable(
      "This order has already been processed and cannot be modified.".to_string(),
    ));
  }

  let product_ids: Vec<i32> = items.iter().map(|i| i.product_id).collect();
  let prices = catalog::price_map(&mut *tx, &product_ids).await?;
  let (lines, total_cents) = price_lines(items, &prices)?;

  sqlx::query("DELETE FROM order_items WHERE order_id = $1")
    .bind(order_id)
    .execute(&mut *tx)
    .await?;

  insert_items(&mut tx, order_id, &lines).await?;

  sqlx::query("UPDATE orders SET total_cents = $2, updated_at = NOW() WHERE id = $1")
    .bind(order_id)
    .bind(total_cents)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;
  info!(order_id = %order_id, total_cents, "Order updated.");
  Ok(total_cents)
}

/// Transitions a pending order to cancelled. No refund logic exists here;
/// payment is out of scope.
#[instrument(name = "orders::cancel_order", skip(pool), fields(user_id = %user_id, order_id = %order_id))]
pub async fn cancel_order(pool: &PgPool, user_id: Uuid, order_id: Uuid) -> Result<()> {
  let mut tx = pool.begin().await?;

  let order = lock_owned_order(&mut tx, user_id, order_id).await?;
  if !order.status.can_transition_to(OrderStatus::Cancelled) {
    return Err(AppError::OrderNotCancellable(
      "Only pending orders can be cancelled.".to_string(),
    ));
  }

  sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
    .bind(order_id)
    .bind(OrderStatus::Cancelled)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;
  info!(order_id = %order_id, "Order cancelled.");
  Ok(())
}

/// Lists the caller's orders, newest first, optionally filtered by status
/// and/or an order-id substring.
#[instrument(name = "orders::list_orders", skip(pool), fields(user_id = %user_id))]
pub async fn list_orders(
  pool: &PgPool,
  user_id: Uuid,
  status: Option<OrderStatus>,
  id_filter: Option<&str>,
) -> Result<Vec<Order>> {
  let orders = sqlx::query_as::<_, Order>(
    r#"
    SELECT id, user_id, status, total_cents, created_at, updated_at
    FROM orders
    WHERE user_id = $1
      AND ($2::order_status IS NULL OR status = $2)
      AND ($3::text IS NULL OR id::text ILIKE '%' || $3 || '%')
    ORDER BY created_at DESC
    "#,
  )
  .bind(user_id)
  .bind(status)
  .bind(id_filter)
  .fetch_all(pool)
  .await?;

  Ok(orders)
}

/// Fetches one of the caller's orders together with its line items, joined
/// with products for denormalized name/image. Unit prices come from the
/// frozen order-item copies, not the product rows.
#[instrument(name = "orders::order_detail", skip(pool), fields(user_id = %user_id, order_id = %order_id))]
pub async fn order_detail(pool: &PgPool, user_id: Uuid, order_id: Uuid) -> Result<(Order, Vec<OrderItemDetail>)> {
  let order = sqlx::query_as::<_, Order>(
    "SELECT id, user_id, status, total_cents, created_at, updated_at FROM orders WHERE id = $1 AND user_id = $2",
  )
  .bind(order_id)
  .bind(user_id)
  .fetch_optional(pool)
  .await?
  .ok_or_else(|| AppError::NotFound("Order not found.".to_string()))?;

  let items = sqlx::query_as::<_, OrderItemDetail>(
    r#"
    SELECT oi.product_id, p.name AS product_name, p.image_url, oi.quantity, oi.price_cents
    FROM order_items oi
    JOIN products p ON p.id = oi.product_id
    WHERE oi.order_id = $1
    ORDER BY p.name
    "#,
  )
  .bind(order_id)
  .fetch_all(pool)
  .await?;

  Ok((order, items))
}

/// Materializes priced lines as `OrderItem` rows under `order_id` and inserts
/// them within the caller's transaction.
async fn insert_items(
  tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
  order_id: Uuid,
  lines: &[PricedLine],
) -> Result<()> {
  for line in lines {
    let item = OrderItem {
      id: Uuid::new_v4(),
      order_id,
      product_id: line.product_id,
      quantity: line.quantity,
      price_cents: line.price_cents,
    };
    sqlx::query("INSERT INTO order_items (id, order_id, product_id, quantity, price_cents) VALUES ($1, $2, $3, $4, $5)")
      .bind(item.id)
      .bind(item.order_id)
      .bind(item.product_id)
      .bind(item.quantity)
      .bind(item.price_cents)
      .execute(&mut **tx)
      .await?;
  }
  Ok(())
}

/// Locks the order row for the duration of the transaction and verifies
/// ownership. A missing order and someone else's order both surface as
/// `NotFound`, so non-owners learn nothing.
async fn lock_owned_order(tx: &mut sqlx::Transaction<'_, sqlx::Postgres>, user_id: Uuid, order_id: Uuid) -> Result<Order> {
  let order = sqlx::query_as::<_, Order>(
    "SELECT id, user_id, status, total_cents, created_at, updated_at FROM orders WHERE id = $1 FOR UPDATE",
  )
  .bind(order_id)
  .fetch_optional(&mut **tx)
  .await?
  .ok_or_else(|| AppError::NotFound("Order not found or you do not have permission.".to_string()))?;

  if order.user_id != user_id {
    return Err(AppError::NotFound(
      "Order not found or you do not have permission.".to_string(),
    ));
  }
  Ok(order)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line(product_id: i32, quantity: i32) -> OrderLineInput {
    OrderLineInput { product_id, quantity }
  }

  #[test]
  fn pricing_ignores_everything_but_the_catalog() {
    // product 1 costs 2.50, product 2 costs 4.00
    let prices = HashMap::from([(1, 250_i64), (2, 400_i64)]);
    let items = [line(1, 2), line(2, 1)];
    let (lines, total) = price_lines(&items, &prices).unwrap();
    assert_eq!(total, 900);
    assert_eq!(
      lines,
      vec![
        PricedLine { product_id: 1, quantity: 2, price_cents: 250 },
        PricedLine { product_id: 2, quantity: 1, price_cents: 400 },
      ]
    );
  }

  #[test]
  fn client_supplied_price_fields_are_dropped_at_the_boundary() {
    // The DTO has no price field, so a tampered payload deserializes to the
    // same input an honest one does.
    let tampered: Vec<OrderLineInput> =
      serde_json::from_str(r#"[{"product_id": 1, "quantity": 2, "price": 0.01}]"#).unwrap();
    let prices = HashMap::from([(1, 250_i64)]);
    let (_, total) = price_lines(&tampered, &prices).unwrap();
    assert_eq!(total, 500);
  }

  #[test]
  fn unknown_product_id_fails_with_product_not_found() {
    let prices = HashMap::from([(1, 250_i64)]);
    let items = [line(1, 1), line(42, 1)];
    let err = price_lines(&items, &prices).unwrap_err();
    assert!(matches!(err, AppError::ProductNotFound(42)));
  }

  #[test]
  fn empty_item_list_is_invalid() {
    let err = validate_items(&[]).unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
  }

  #[test]
  fn non_positive_quantities_are_invalid() {
    for qty in [0, -1] {
      let err = validate_items(&[line(1, qty)]).unwrap_err();
      assert!(matches!(err, AppError::InvalidInput(_)));
    }
  }

  #[test]
  fn duplicate_product_ids_are_invalid() {
    let err = validate_items(&[line(1, 1), line(1, 2)]).unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
  }

  #[test]
  fn full_replacement_totals_come_only_from_the_new_lines() {
    // Order originally held product 1 qty 2; the edit submits only product 3.
    let prices = HashMap::from([(3, 520_i64)]);
    let replacement = [line(3, 1)];
    validate_items(&replacement).unwrap();
    let (lines, total) = price_lines(&replacement, &prices).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_id, 3);
    assert_eq!(total, 520);
  }
}
