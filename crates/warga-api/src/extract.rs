//! Request extractors shared by the handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Deserialize;
use warga_core::{Actor, Error, page::ListQuery};

use crate::error::ApiError;

/// The acting user, as placed in the request extensions by the
/// authentication layer in front of the router. Rejects with 401 when absent.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Actor>()
      .cloned()
      .map(CurrentActor)
      .ok_or(ApiError::Registry(Error::Unauthorized))
  }
}

/// `?page=&limit=&search=`; entity filters are read by a second `Query`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub page:   Option<u64>,
  pub limit:  Option<u64>,
  pub search: Option<String>,
}

impl ListParams {
  pub fn with<F>(self, filter: F) -> ListQuery<F> {
    ListQuery { page: self.page, limit: self.limit, search: self.search, filter }
  }
}
