use serde::Serialize;
use std::num::NonZeroU32;

/// 1-indexed page number requested by a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
  pub const FIRST: Self = Self(NonZeroU32::MIN);

  #[must_use]
  pub const fn new(n: u32) -> Option<Self> {
    match NonZeroU32::new(n) {
      Some(n) => Some(Self(n)),
      None => None,
    }
  }

  /// Reads the `?page=` query value. Anything missing or not a
  /// positive number is the first page.
  #[must_use]
  pub fn from_query(value: Option<&str>) -> Self {
    value
      .and_then(|v| v.trim().parse::<u32>().ok())
      .and_then(Self::new)
      .unwrap_or(Self::FIRST)
  }

  #[must_use]
  pub const fn get(self) -> u32 {
    self.0.get()
  }
}

impl Default for PageNumber {
  fn default() -> Self {
    Self::FIRST
  }
}

impl std::fmt::Display for PageNumber {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

/// Page arithmetic shared by every feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
  page_size: NonZeroU32,
}

impl Paginator {
  #[must_use]
  pub const fn new(page_size: NonZeroU32) -> Self {
    Self { page_size }
  }

  #[must_use]
  pub const fn page_size(&self) -> u32 {
    self.page_size.get()
  }

  /// `LIMIT` and `OFFSET` of the requested page.
  #[must_use]
  pub fn window(&self, number: PageNumber) -> (i64, i64) {
    let limit = u64::from(self.page_size.get());
    let offset = u64::from(number.get() - 1) * limit;
    (
      i64::try_from(limit).unwrap_or(i64::MAX),
      i64::try_from(offset).unwrap_or(i64::MAX),
    )
  }

  /// An empty feed still has one (empty) page.
  #[must_use]
  pub fn total_pages(&self, total_items: u64) -> u64 {
    total_items.div_ceil(u64::from(self.page_size.get())).max(1)
  }

  #[must_use]
  pub fn page<T>(&self, number: PageNumber, total_items: u64, items: Vec<T>) -> Page<T> {
    let total_pages = self.total_pages(total_items);
    Page {
      number: number.get(),
      page_size: self.page_size.get(),
      total_items,
      total_pages,
      has_next: u64::from(number.get()) < total_pages,
      has_previous: number.get() > 1,
      items,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
  pub number: u32,
  pub page_size: u32,
  pub total_items: u64,
  pub total_pages: u64,
  pub has_next: bool,
  pub has_previous: bool,
  pub items: Vec<T>,
}

impl<T> Page<T> {
  #[must_use]
  pub fn len(&self) -> usize {
    self.items.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}
