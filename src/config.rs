// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_database_url_is_a_config_error() {
    // Only assert on the failure path: other tests (or a developer .env) may
    // set DATABASE_URL, in which case from_env legitimately succeeds.
    if env::var("DATABASE_URL").is_err() && !std::path::Path::new(".env").exists() {
      let err = AppConfig::from_env().unwrap_err();
      assert!(matches!(err, AppError::Config(_)));
    }
  }
}
