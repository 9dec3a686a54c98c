use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use std::time::Duration;

/// Pagination and caching of post feeds.
#[derive(Debug, Clone, Deserialize)]
pub struct Feed {
  /// Posts per page, shared by every feed.
  ///
  /// **Environment variables**:
  /// - `YATUBE_FEED_PAGE_SIZE`
  #[serde(default = "Feed::default_page_size")]
  pub page_size: NonZeroU32,
  /// How long a rendered global feed page is served from the cache.
  /// Writes do not invalidate it, so readers may see content this
  /// old.
  ///
  /// **Environment variables**:
  /// - `YATUBE_FEED_CACHE_TTL_SECS`
  #[serde(default = "Feed::default_cache_ttl_secs")]
  pub cache_ttl_secs: NonZeroU64,
}

impl Feed {
  const DEFAULT_PAGE_SIZE: u32 = 10;
  const DEFAULT_CACHE_TTL_SECS: u64 = 20;

  const fn default_page_size() -> NonZeroU32 {
    match NonZeroU32::new(Self::DEFAULT_PAGE_SIZE) {
      Some(n) => n,
      None => panic!("DEFAULT_PAGE_SIZE is accidentally set to 0"),
    }
  }

  const fn default_cache_ttl_secs() -> NonZeroU64 {
    match NonZeroU64::new(Self::DEFAULT_CACHE_TTL_SECS) {
      Some(n) => n,
      None => panic!("DEFAULT_CACHE_TTL_SECS is accidentally set to 0"),
    }
  }

  #[must_use]
  pub fn cache_ttl(&self) -> Duration {
    Duration::from_secs(self.cache_ttl_secs.get())
  }
}

impl Default for Feed {
  fn default() -> Self {
    Self {
      page_size: Self::default_page_size(),
      cache_ttl_secs: Self::default_cache_ttl_secs(),
    }
  }
}
