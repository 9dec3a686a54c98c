use serde::{Deserialize, Serialize};
use validator::{extras::is_blank, Validate, ValidateError};

use super::REQUIRED;

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommentForm {
  #[serde(default)]
  pub text: String,
}

impl Validate for CommentForm {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    fields.insert("text", {
      let mut error = ValidateError::msg_builder();
      if is_blank(&self.text) {
        error.insert(REQUIRED);
      }
      error.build()
    });
    fields.build().into_result()
  }
}

impl CommentForm {
  /// Returns the comment text to store.
  pub fn clean(&self) -> Result<String, ValidateError> {
    self.validate()?;
    Ok(self.text.trim().to_string())
  }
}
