use serde::{Deserialize, Serialize};
use validator::{extras::is_blank, Validate, ValidateError};

use super::{non_empty, INVALID_CHOICE, REQUIRED};
use crate::types::id::GroupId;

/// Submission of the create/edit post form, exactly as the client
/// sent it. It is echoed back when the form has to be shown again.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostForm {
  #[serde(default)]
  pub text: String,
  #[serde(default)]
  pub group: Option<String>,
  /// Reference returned by the media storage for an uploaded image.
  #[serde(default)]
  pub image: Option<String>,
}

/// Validated post data, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPost {
  pub text: String,
  pub group_id: Option<GroupId>,
  pub image: Option<String>,
}

impl Validate for PostForm {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    fields.insert("text", {
      let mut error = ValidateError::msg_builder();
      if is_blank(&self.text) {
        error.insert(REQUIRED);
      }
      error.build()
    });

    if let Some(group) = non_empty(self.group.as_deref()) {
      if group.parse::<GroupId>().is_err() {
        fields.push_message("group", INVALID_CHOICE);
      }
    }

    fields.build().into_result()
  }
}

impl PostForm {
  /// Validates the submission and turns it into [`CleanPost`].
  ///
  /// Whether the chosen group exists is up to the caller, since that
  /// needs the store.
  pub fn clean(&self) -> Result<CleanPost, ValidateError> {
    self.validate()?;

    let group_id = match non_empty(self.group.as_deref()) {
      Some(group) => group
        .parse::<GroupId>()
        .map(Some)
        .map_err(|_| ValidateError::single("group", INVALID_CHOICE))?,
      None => None,
    };

    Ok(CleanPost {
      text: self.text.trim().to_string(),
      group_id,
      image: non_empty(self.image.as_deref()).map(str::to_string),
    })
  }
}
