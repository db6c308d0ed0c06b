// src/cart.rs

//! The in-memory Cart Store: a per-session mapping of product to quantity,
//! kept only for the lifetime of the session and never persisted. The server
//! sends only `{product_id, quantity}` pairs onward at checkout; unit prices
//! on cart lines are display snapshots taken at add time and are never
//! trusted for order totals.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::Product;

/// One aggregated (product, quantity) entry in the pre-order basket, carrying
/// display fields copied from the catalog entry at time of add.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
  pub product_id: i32,
  pub name: String,
  pub price_cents: i64,
  pub image_url: String,
  pub quantity: i32,
}

/// A single session's cart. At most one line per product id; quantity on a
/// line is always >= 1 (a line whose quantity would reach 0 is removed).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
  lines: Vec<CartLine>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds one unit of `product`. An existing line is incremented; otherwise a
  /// new quantity-1 line is inserted with display fields snapshotted from the
  /// catalog entry.
  pub fn add(&mut self, product: &Product) {
    if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
      line.quantity += 1;
    } else {
      self.lines.push(CartLine {
        product_id: product.id,
        name: product.name.clone(),
        price_cents: product.price_cents,
        image_url: product.image_url.clone(),
        quantity: 1,
      });
    }
  }

  /// Removes one unit. A quantity-1 line is removed outright; an absent
  /// product id is a no-op.
  pub fn decrement(&mut self, product_id: i32) {
    if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
      if line.quantity > 1 {
        line.quantity -= 1;
      } else {
        self.lines.retain(|l| l.product_id != product_id);
      }
    }
  }

  /// Deletes the line unconditionally; no-op when absent.
  pub fn remove(&mut self, product_id: i32) {
    self.lines.retain(|l| l.product_id != product_id);
  }

  /// Empties the cart. Called after a successful order placement.
  pub fn clear(&mut self) {
    self.lines.clear();
  }

  pub fn lines(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  /// Sum of quantities across lines.
  pub fn item_count(&self) -> i64 {
    self.lines.iter().map(|l| l.quantity as i64).sum()
  }

  /// Sum of `price * quantity` across lines. Display value only.
  pub fn total_cents(&self) -> i64 {
    self.lines.iter().map(|l| l.price_cents * l.quantity as i64).sum()
  }
}

/// Session-token-keyed registry of carts. Each session keeps an independent
/// cart; there is no cross-session synchronization.
#[derive(Debug, Default)]
pub struct CartRegistry {
  carts: RwLock<HashMap<String, Cart>>,
}

impl CartRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Snapshot of the session's cart (empty if none exists yet).
  pub fn snapshot(&self, session: &str) -> Cart {
    self.carts.read().get(session).cloned().unwrap_or_default()
  }

  /// Applies `f` to the session's cart, creating it on first use, and returns
  /// the updated snapshot.
  pub fn with_cart<F>(&self, session: &str, f: F) -> Cart
  where
    F: FnOnce(&mut Cart),
  {
    let mut carts = self.carts.write();
    let cart = carts.entry(session.to_string()).or_default();
    f(cart);
    cart.clone()
  }

  /// Drops the session's cart entirely (after checkout).
  pub fn clear(&self, session: &str) {
    self.carts.write().remove(session);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn product(id: i32, name: &str, price_cents: i64) -> Product {
    Product {
      id,
      name: name.to_string(),
      description: None,
      price_cents,
      image_url: format!("/images/{}.jpg", id),
      category: "Savory".to_string(),
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn adding_the_same_product_twice_yields_one_line_with_quantity_two() {
    let mut cart = Cart::new();
    let p = product(1, "Taralli Classici", 450);
    cart.add(&p);
    cart.add(&p);
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].quantity, 2);
    assert_eq!(cart.item_count(), 2);
  }

  #[test]
  fn total_is_sum_of_price_times_quantity() {
    // product A (2.50) qty 2 + product B (4.00) qty 1 => 9.00
    let mut cart = Cart::new();
    let a = product(1, "A", 250);
    let b = product(2, "B", 400);
    cart.add(&a);
    cart.add(&a);
    cart.add(&b);
    assert_eq!(cart.total_cents(), 900);
    assert_eq!(cart.item_count(), 3);
  }

  #[test]
  fn decrement_removes_a_quantity_one_line() {
    let mut cart = Cart::new();
    let p = product(1, "A", 250);
    cart.add(&p);
    cart.decrement(1);
    assert!(cart.is_empty());
    assert_eq!(cart.item_count(), 0);
  }

  #[test]
  fn decrement_above_one_keeps_the_line() {
    let mut cart = Cart::new();
    let p = product(1, "A", 250);
    cart.add(&p);
    cart.add(&p);
    cart.decrement(1);
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].quantity, 1);
  }

  #[test]
  fn decrement_and_remove_of_absent_products_are_no_ops() {
    let mut cart = Cart::new();
    let p = product(1, "A", 250);
    cart.add(&p);
    cart.decrement(99);
    cart.remove(99);
    assert_eq!(cart.item_count(), 1);
  }

  #[test]
  fn remove_deletes_the_whole_line_regardless_of_quantity() {
    let mut cart = Cart::new();
    let p = product(1, "A", 250);
    cart.add(&p);
    cart.add(&p);
    cart.add(&p);
    cart.remove(1);
    assert!(cart.is_empty());
  }

  #[test]
  fn item_count_tracks_any_sequence_of_operations() {
    let mut cart = Cart::new();
    let a = product(1, "A", 100);
    let b = product(2, "B", 200);
    cart.add(&a);
    cart.add(&b);
    cart.add(&a);
    cart.decrement(2); // removes b (qty 1)
    cart.add(&b);
    cart.remove(1);
    let expected: i64 = cart.lines().iter().map(|l| l.quantity as i64).sum();
    assert_eq!(cart.item_count(), expected);
    assert!(cart.item_count() >= 0);
    assert_eq!(cart.item_count(), 1); // only b, qty 1
  }

  #[test]
  fn clear_empties_all_lines() {
    let mut cart = Cart::new();
    cart.add(&product(1, "A", 100));
    cart.add(&product(2, "B", 200));
    cart.clear();
    assert!(cart.is_empty());
    assert_eq!(cart.total_cents(), 0);
  }

  #[test]
  fn line_price_is_snapshotted_at_add_time() {
    let mut cart = Cart::new();
    let mut p = product(1, "A", 250);
    cart.add(&p);
    p.price_cents = 999; // later catalog change
    cart.add(&p); // increments the existing line, keeps the original snapshot
    assert_eq!(cart.lines()[0].price_cents, 250);
    assert_eq!(cart.total_cents(), 500);
  }

  #[test]
  fn registry_keeps_sessions_independent() {
    let registry = CartRegistry::new();
    let p = product(1, "A", 100);
    registry.with_cart("session-a", |c| c.add(&p));
    registry.with_cart("session-a", |c| c.add(&p));
    registry.with_cart("session-b", |c| c.add(&p));
    assert_eq!(registry.snapshot("session-a").item_count(), 2);
    assert_eq!(registry.snapshot("session-b").item_count(), 1);
    registry.clear("session-a");
    assert!(registry.snapshot("session-a").is_empty());
    assert_eq!(registry.snapshot("session-b").item_count(), 1);
  }
}
