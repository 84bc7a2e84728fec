//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Unauthorized")]
  Unauthorized,
  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),
  #[error("password hash error: {0}")]
  PasswordHash(String),
  #[error("store error: {0}")]
  Store(#[from] warga_store_sqlite::Error),
  #[error(transparent)]
  Registry(#[from] warga_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res =
          (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"warga\""),
        );
        res
      }
      other => {
        tracing::error!(error = %other, "server error");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": other.to_string() })))
          .into_response()
      }
    }
  }
}
