// src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::errors::AppError;
use crate::services::catalog;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
  pub category: Option<String>,
  pub search: Option<String>,
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let products = catalog::list_products(&app_state.db_pool, query.category.as_deref(), query.search.as_deref()).await?;
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
  let product = catalog::get_product(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(product))
}
