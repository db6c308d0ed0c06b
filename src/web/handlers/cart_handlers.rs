// src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::cart::Cart;
use crate::errors::AppError;
use crate::services::{catalog, orders};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

fn cart_body(cart: &Cart, message: Option<&str>) -> serde_json::Value {
  json!({
    "message": message,
    "items": cart.lines(),
    "itemCount": cart.item_count(),
    "totalCents": cart.total_cents(),
  })
}

#[instrument(name = "handler::get_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = app_state.carts.snapshot(&auth_user.session_token);
  Ok(HttpResponse::Ok().json(cart_body(&cart, None)))
}

#[derive(Debug, Deserialize)]
pub struct AddCartItemPayload {
  pub product_id: i32,
}

#[instrument(
  name = "handler::add_cart_item",
  skip(app_state, auth_user, payload),
  fields(user_id = %auth_user.user_id, product_id = %payload.product_id)
)]
pub async fn add_cart_item_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<AddCartItemPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  // Display fields on the line are snapshotted from the catalog entry now;
  // the trusted price is re-read at checkout regardless.
  let product = catalog::get_product(&app_state.db_pool, payload.product_id).await?;
  let message = format!("{} has been added to your cart.", product.name);
  let cart = app_state.carts.with_cart(&auth_user.session_token, |c| c.add(&product));
  Ok(HttpResponse::Ok().json(cart_body(&cart, Some(&message))))
}

#[instrument(name = "handler::decrement_cart_item", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn decrement_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let cart = app_state
    .carts
    .with_cart(&auth_user.session_token, |c| c.decrement(product_id));
  Ok(HttpResponse::Ok().json(cart_body(&cart, None)))
}

#[instrument(name = "handler::remove_cart_item", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let cart = app_state
    .carts
    .with_cart(&auth_user.session_token, |c| c.remove(product_id));
  Ok(HttpResponse::Ok().json(cart_body(&cart, Some("Item removed from cart."))))
}

#[instrument(name = "handler::clear_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state.carts.clear(&auth_user.session_token);
  Ok(HttpResponse::Ok().json(cart_body(&Cart::new(), Some("Cart cleared."))))
}

/// Converts the session's cart into an order and clears the cart on success.
/// Only product ids and quantities leave the cart; the order writer re-prices
/// every line from the catalog.
#[instrument(name = "handler::checkout", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = app_state.carts.snapshot(&auth_user.session_token);
  if cart.is_empty() {
    return Err(AppError::InvalidInput("Your cart is empty.".to_string()));
  }

  let items: Vec<orders::OrderLineInput> = cart
    .lines()
    .iter()
    .map(|l| orders::OrderLineInput {
      product_id: l.product_id,
      quantity: l.quantity,
    })
    .collect();

  let order_id = orders::create_order(&app_state.db_pool, auth_user.user_id, &items).await?;
  app_state.carts.clear(&auth_user.session_token);
  info!(order_id = %order_id, "Checkout complete, cart cleared.");

  Ok(HttpResponse::Created().json(json!({
    "message": "Order placed successfully.",
    "orderId": order_id,
  })))
}
