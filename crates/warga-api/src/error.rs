//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body has the shape `{ "error": message, "code"?, "fields"? }`.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, warn};
use warga_core::Error as CoreError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Registry(#[from] CoreError),

  #[error(transparent)]
  Sheet(warga_sheet::Error),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl From<warga_sheet::Error> for ApiError {
  fn from(err: warga_sheet::Error) -> Self {
    match err {
      warga_sheet::Error::Registry(inner) => Self::Registry(inner),
      other => Self::Sheet(other),
    }
  }
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      Self::Registry(err) => match err {
        CoreError::Unauthorized => StatusCode::UNAUTHORIZED,
        CoreError::Forbidden { .. } => StatusCode::FORBIDDEN,
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Duplicate(_) | CoreError::InUse(_) => StatusCode::CONFLICT,
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
      },
      Self::Sheet(warga_sheet::Error::NotImportable(_)) => StatusCode::NOT_FOUND,
      Self::Sheet(warga_sheet::Error::CsvWrite(_) | warga_sheet::Error::WorkbookWrite(_)) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
      Self::Sheet(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
    }
  }

  fn body(&self) -> Value {
    match self {
      Self::Registry(CoreError::Validation(fields)) => json!({
        "error": self.to_string(),
        "code": "VALIDATION",
        "fields": fields,
      }),
      Self::Registry(CoreError::Store { message, code: Some(code) }) => {
        json!({ "error": message, "code": code })
      }
      Self::Registry(CoreError::Duplicate(message)) => {
        json!({ "error": message, "code": "DUPLICATE" })
      }
      Self::Registry(CoreError::InUse(message)) => json!({ "error": message, "code": "IN_USE" }),
      other => json!({ "error": other.to_string() }),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      error!(error = %self, "request failed");
    } else if status == StatusCode::FORBIDDEN {
      warn!(error = %self, "access denied");
    }

    let mut res = (status, Json(self.body())).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"warga\""),
      );
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  #[test]
  fn registry_errors_map_to_statuses() {
    let cases = [
      (CoreError::Unauthorized, StatusCode::UNAUTHORIZED),
      (CoreError::field("nik", "NIK harus 16 digit"), StatusCode::BAD_REQUEST),
      (CoreError::Duplicate("NIK sudah terdaftar.".into()), StatusCode::CONFLICT),
      (CoreError::InUse("dipakai".into()), StatusCode::CONFLICT),
      (CoreError::NotFound { entity: "penduduk", id: Uuid::nil() }, StatusCode::NOT_FOUND),
      (CoreError::Store { message: "disk".into(), code: None }, StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).status(), status);
    }
  }

  #[test]
  fn validation_body_lists_fields() {
    let body = ApiError::from(CoreError::field("nik", "NIK harus 16 digit")).body();
    assert_eq!(body["error"], "NIK harus 16 digit");
    assert_eq!(body["fields"]["nik"][0], "NIK harus 16 digit");
  }

  #[test]
  fn unauthorized_challenges_for_basic_auth() {
    let res = ApiError::from(CoreError::Unauthorized).into_response();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[test]
  fn sheet_registry_errors_unwrap() {
    let err = ApiError::from(warga_sheet::Error::Registry(CoreError::Unauthorized));
    assert!(matches!(err, ApiError::Registry(CoreError::Unauthorized)));
  }
}
