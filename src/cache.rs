use actix_web::web::Bytes;
use moka::future::Cache;
use std::time::Duration;

use crate::feed::PageNumber;

/// Rendered global feed pages kept for a fixed time to live.
///
/// Writes never invalidate entries, so a reader may get a page that
/// is up to `time_to_live` old. Only [`PageCache::clear`] drops them
/// early.
#[derive(Clone)]
pub struct PageCache {
  inner: Cache<String, Bytes>,
  time_to_live: Duration,
}

impl PageCache {
  pub const INDEX_PAGE_PREFIX: &'static str = "index_page";

  #[must_use]
  pub fn new(time_to_live: Duration) -> Self {
    Self {
      inner: Cache::builder().time_to_live(time_to_live).build(),
      time_to_live,
    }
  }

  #[must_use]
  pub fn key(number: PageNumber) -> String {
    format!("{}:{number}", Self::INDEX_PAGE_PREFIX)
  }

  pub async fn get(&self, number: PageNumber) -> Option<Bytes> {
    self.inner.get(&Self::key(number)).await
  }

  pub async fn insert(&self, number: PageNumber, body: Bytes) {
    self.inner.insert(Self::key(number), body).await;
  }

  /// Drops every cached page at once.
  pub fn clear(&self) {
    tracing::debug!("clearing feed page cache");
    self.inner.invalidate_all();
  }
}

impl std::fmt::Debug for PageCache {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PageCache")
      .field("time_to_live", &self.time_to_live)
      .field("entries", &self.inner.entry_count())
      .finish()
  }
}
