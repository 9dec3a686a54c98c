use url::Url;

#[must_use]
pub fn validate_url(url: &str) -> bool {
  Url::parse(url).is_ok()
}

/// Whitespace-only text counts as missing, the same way an
/// empty text field is.
#[must_use]
pub fn is_blank(text: &str) -> bool {
  text.trim().is_empty()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_validate_url() {
    assert!(validate_url("sqlite://yatube.db?mode=rwc"));
    assert!(validate_url("sqlite::memory:"));
    assert!(!validate_url("not a url"));
  }

  #[test]
  fn test_is_blank() {
    assert!(is_blank(""));
    assert!(is_blank(" \t\n"));
    assert!(!is_blank(" hi "));
  }
}
