//! Page-window arithmetic and list query types.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Caller-facing list parameters. `page` is 1-based.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery<F> {
  pub page:   Option<u64>,
  pub limit:  Option<u64>,
  /// Case-insensitive substring matched against the entity's search columns.
  pub search: Option<String>,
  pub filter: F,
}

impl<F> ListQuery<F> {
  pub fn new(filter: F) -> Self {
    Self { page: None, limit: None, search: None, filter }
  }

  pub fn page(mut self, page: u64, limit: u64) -> Self {
    self.page = Some(page);
    self.limit = Some(limit);
    self
  }

  pub fn search(mut self, text: impl Into<String>) -> Self {
    self.search = Some(text.into());
    self
  }

  /// Resolve the page window and hand the store a normalized [`Listing`].
  pub fn into_listing(self) -> Listing<F> {
    let window = Window::new(self.page, self.limit);
    let search = self
      .search
      .map(|s| s.trim().to_owned())
      .filter(|s| !s.is_empty());
    Listing { search, filter: self.filter, window }
  }
}

/// Offset/limit pair derived from a 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
  pub page:   u64,
  pub limit:  u64,
  pub offset: u64,
}

impl Window {
  pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = (page - 1).saturating_mul(limit).min(i64::MAX as u64);
    Self { page, limit, offset }
  }
}

/// What a store receives for a paginated read.
#[derive(Debug, Clone)]
pub struct Listing<F> {
  pub search: Option<String>,
  pub filter: F,
  pub window: Window,
}

/// One page of results plus the exact total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
  pub data:        Vec<T>,
  pub total:       u64,
  pub page:        u64,
  pub limit:       u64,
  pub total_pages: u64,
}

impl<T> Page<T> {
  pub fn new(data: Vec<T>, total: u64, window: Window) -> Self {
    Self {
      data,
      total,
      page: window.page,
      limit: window.limit,
      total_pages: total_pages(total, window.limit),
    }
  }
}

/// `ceil(total / limit)`, never less than one.
pub fn total_pages(total: u64, limit: u64) -> u64 {
  total.div_ceil(limit.max(1)).max(1)
}
