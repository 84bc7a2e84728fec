//! HTTP Basic-auth extractor, verifier and middleware.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::{FromRequestParts, Request},
  http::{HeaderMap, request::Parts},
  middleware::Next,
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use rand_core::OsRng;
use serde::Deserialize;
use tracing::warn;
use warga_core::Actor;

use crate::error::{Error, Result};

/// One sign-in account from the configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Credentials accepted as valid for this server instance.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
  pub accounts: Vec<Account>,
}

impl AuthConfig {
  pub fn new(accounts: Vec<Account>) -> Self { Self { accounts } }

  fn account(&self, username: &str) -> Option<&Account> {
    self.accounts.iter().find(|a| a.username == username)
  }
}

/// The verified caller. Present in a handler means the request was
/// authenticated.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Actor);

/// Verify credentials directly from headers.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<Actor> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  let Some(account) = config.account(username) else {
    warn!(username, "sign-in with unknown account");
    return Err(Error::Unauthorized);
  };

  let parsed_hash = PasswordHash::new(&account.password_hash).map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| {
      warn!(username, "sign-in with wrong password");
      Error::Unauthorized
    })?;

  Ok(Actor::new(username))
}

impl FromRequestParts<Arc<AuthConfig>> for Authenticated {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &Arc<AuthConfig>,
  ) -> Result<Self, Self::Rejection> {
    Ok(Authenticated(verify_auth(&parts.headers, state)?))
  }
}

/// Authenticate the request and hand the [`Actor`] to the API handlers
/// through the request extensions.
pub async fn require_auth(
  Authenticated(actor): Authenticated,
  mut request: Request,
  next: Next,
) -> Response {
  request.extensions_mut().insert(actor);
  next.run(request).await
}

/// Hash `password` into an argon2 PHC string for the configuration file.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

#[cfg(test)]
mod tests {
  use axum::http::{Request, header};

  use super::*;

  fn config(password: &str) -> Arc<AuthConfig> {
    Arc::new(AuthConfig::new(vec![Account {
      username:      "kades".to_string(),
      password_hash: hash_password(password).unwrap(),
    }]))
  }

  async fn extract(
    req: Request<axum::body::Body>,
    state: &Arc<AuthConfig>,
  ) -> Result<Authenticated, Error> {
    let (mut parts, _) = req.into_parts();
    Authenticated::from_request_parts(&mut parts, state).await
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  #[tokio::test]
  async fn correct_credentials() {
    let state = config("secret");
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("kades", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    let Authenticated(actor) = extract(req, &state).await.unwrap();
    assert_eq!(actor.user_id, "kades");
  }

  #[tokio::test]
  async fn wrong_password() {
    let state = config("secret");
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("kades", "wrong"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(extract(req, &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn unknown_account() {
    let state = config("secret");
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("sekdes", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(extract(req, &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn missing_header() {
    let state = config("secret");
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(matches!(extract(req, &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn invalid_base64() {
    let state = config("secret");
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Basic !!!not-base64!!!")
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(extract(req, &state).await, Err(Error::Unauthorized)));
  }
}
