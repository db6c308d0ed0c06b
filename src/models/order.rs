// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid; // Renamed Type to SqlxType to avoid conflict

// Matches the `order_status` enum type in schema.sql.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  /// The order state machine:
  /// pending -> {shipped, cancelled}; shipped -> delivered;
  /// delivered and cancelled are terminal.
  pub fn can_transition_to(self, next: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!((self, next), (Pending, Shipped) | (Pending, Cancelled) | (Shipped, Delivered))
  }

  /// Edit and cancel are only reachable from `Pending`.
  pub fn is_pending(self) -> bool {
    self == OrderStatus::Pending
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub status: OrderStatus,
  pub total_cents: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::OrderStatus::*;

  #[test]
  fn pending_is_the_only_mutable_status() {
    assert!(Pending.is_pending());
    for s in [Shipped, Delivered, Cancelled] {
      assert!(!s.is_pending());
    }
  }

  #[test]
  fn allowed_transitions() {
    assert!(Pending.can_transition_to(Shipped));
    assert!(Pending.can_transition_to(Cancelled));
    assert!(Shipped.can_transition_to(Delivered));
  }

  #[test]
  fn terminal_statuses_admit_no_transition() {
    for s in [Pending, Shipped, Delivered, Cancelled] {
      assert!(!Delivered.can_transition_to(s));
      assert!(!Cancelled.can_transition_to(s));
    }
    // A second cancel is also a no-go.
    assert!(!Cancelled.can_transition_to(Cancelled));
  }
}
