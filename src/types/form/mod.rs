pub mod comment;
pub mod post;

pub use comment::CommentForm;
pub use post::{CleanPost, PostForm};

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const INVALID_CHOICE: &str =
  "Select a valid choice. That choice is not one of the available choices.";

/// Browsers send untouched optional inputs as empty strings.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}
