// src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::OrderStatus;
use crate::services::orders::{self, OrderLineInput};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct CreateOrderPayload {
  pub items: Vec<OrderLineInput>,
}

#[instrument(
  name = "handler::create_order",
  skip(app_state, auth_user, payload),
  fields(user_id = %auth_user.user_id, item_count = payload.items.len())
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateOrderPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order_id = orders::create_order(&app_state.db_pool, auth_user.user_id, &payload.items).await?;
  Ok(HttpResponse::Created().json(json!({ "orderId": order_id })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderPayload {
  pub items: Vec<OrderLineInput>,
}

/// Full-replacement edit: `items` supersedes the order's entire line set.
#[instrument(
  name = "handler::update_order",
  skip(app_state, auth_user, payload),
  fields(user_id = %auth_user.user_id, item_count = payload.items.len())
)]
pub async fn update_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateOrderPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let total_cents = orders::update_order(&app_state.db_pool, auth_user.user_id, order_id, &payload.items).await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Order updated successfully.",
    "orderId": order_id,
    "totalCents": total_cents,
  })))
}

#[instrument(name = "handler::cancel_order", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn cancel_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  orders::cancel_order(&app_state.db_pool, auth_user.user_id, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Order cancelled successfully." })))
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
  pub status: Option<OrderStatus>,
  /// Substring match against the textual order id.
  pub id: Option<String>,
}

#[instrument(name = "handler::list_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListOrdersQuery>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = orders::list_orders(&app_state.db_pool, auth_user.user_id, query.status, query.id.as_deref()).await?;
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::get_order", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let (order, items) = orders::order_detail(&app_state.db_pool, auth_user.user_id, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "order": order, "items": items })))
}
