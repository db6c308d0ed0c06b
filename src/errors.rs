// src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  /// No session, or a session the auth layer does not recognize.
  #[error("Unauthorized: {0}")]
  Unauthorized(String),

  /// Malformed or empty item list, non-positive quantity, duplicate lines.
  #[error("Invalid input: {0}")]
  InvalidInput(String),

  /// A referenced product id has no catalog row. Distinct from `NotFound` so
  /// the client can prompt cart cleanup instead of a generic 404.
  #[error("Product not found: {0}")]
  ProductNotFound(i32),

  #[error("Resource not found: {0}")]
  NotFound(String),

  /// Edit precondition failed: the order is no longer pending.
  #[error("Order is not editable: {0}")]
  OrderNotEditable(String),

  /// Cancel precondition failed: the order is no longer pending.
  #[error("Order is not cancellable: {0}")]
  OrderNotCancellable(String),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Database error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal server error: {0}")]
  Internal(String),
}

// Allow anyhow::Error to be converted into AppError for convenience in code
// using `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      return AppError::Sqlx(err.downcast::<sqlx::Error>().unwrap());
    }
    AppError::Internal(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response.
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Unauthorized(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::InvalidInput(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::ProductNotFound(id) => HttpResponse::UnprocessableEntity()
        .json(json!({"error": format!("Product with ID {} is unavailable.", id), "productId": id})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::OrderNotEditable(m) | AppError::OrderNotCancellable(m) => {
        HttpResponse::Conflict().json(json!({"error": m}))
      }
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
