// src/web/extractors.rs

//! Request extractors. Session issuance lives in the external auth service;
//! this layer only resolves a presented token to a user identity.

use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// The authenticated caller, resolved from `Authorization: Bearer <token>`
/// against the `sessions` table. Absence of a valid identity is a hard
/// `Unauthorized` failure, never an empty result. The raw token doubles as
/// the cart-registry key, so carts stay per-session.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
  pub session_token: String,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
  let header = req.headers().get("Authorization")?.to_str().ok()?;
  let token = header.strip_prefix("Bearer ")?.trim();
  if token.is_empty() {
    None
  } else {
    Some(token.to_string())
  }
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let token = bearer_token(req);
    let app_state = req.app_data::<web::Data<AppState>>().cloned();

    Box::pin(async move {
      let token = token.ok_or_else(|| {
        warn!("AuthenticatedUser extractor: missing or malformed Authorization header.");
        AppError::Unauthorized("User authentication required.".to_string())
      })?;
      let app_state =
        app_state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

      let user_id: Option<Uuid> =
        sqlx::query_scalar("SELECT user_id FROM sessions WHERE token = $1 AND expires_at > NOW()")
          .bind(&token)
          .fetch_optional(&app_state.db_pool)
          .await?;

      match user_id {
        Some(user_id) => Ok(AuthenticatedUser {
          user_id,
          session_token: token,
        }),
        None => {
          warn!("AuthenticatedUser extractor: unknown or expired session token.");
          Err(AppError::Unauthorized("Invalid or expired session.".to_string()))
        }
      }
    })
  }
}
