use indexmap::IndexMap;
use serde::{ser::SerializeMap, Serialize};
use std::borrow::Cow;

fn serialize_index_map<K: Serialize, V: Serialize, S: serde::Serializer>(
  map: &IndexMap<K, V>,
  serializer: S,
) -> Result<S::Ok, S::Error> {
  let mut map_ser = serializer.serialize_map(Some(map.len()))?;
  for (key, value) in map {
    map_ser.serialize_entry(key, value)?;
  }
  map_ser.end()
}

pub struct MessageBuilder(Vec<Cow<'static, str>>);

impl MessageBuilder {
  #[must_use]
  pub const fn new() -> Self {
    Self(Vec::new())
  }

  pub fn insert(&mut self, message: impl Into<Cow<'static, str>>) {
    self.0.push(message.into());
  }

  #[must_use]
  pub fn build(self) -> ValidateError {
    ValidateError::Messages(self.0)
  }
}

pub struct FieldBuilder(IndexMap<Cow<'static, str>, ValidateError>);

#[allow(clippy::new_without_default)]
impl FieldBuilder {
  #[must_use]
  pub fn new() -> Self {
    Self(IndexMap::default())
  }

  /// Empty errors are skipped so callers can insert the result of
  /// every check unconditionally.
  pub fn insert(&mut self, key: impl Into<Cow<'static, str>>, value: ValidateError) {
    if !value.is_empty() {
      self.0.insert(key.into(), value);
    }
  }

  /// Adds one message to a field, keeping any messages the field
  /// already has.
  pub fn push_message(
    &mut self,
    key: impl Into<Cow<'static, str>>,
    message: impl Into<Cow<'static, str>>,
  ) {
    let entry = self
      .0
      .entry(key.into())
      .or_insert_with(|| ValidateError::Messages(Vec::new()));

    match entry {
      ValidateError::Messages(messages) => messages.push(message.into()),
      other => {
        let mut msg = MessageBuilder::new();
        msg.insert(message);
        *other = msg.build();
      }
    }
  }

  #[must_use]
  pub fn build(self) -> ValidateError {
    ValidateError::Fields(self.0)
  }
}

// ---------------------------------------------------- //

#[derive(Clone, PartialEq, Eq)]
pub enum ValidateError {
  Fields(IndexMap<Cow<'static, str>, ValidateError>),
  Messages(Vec<Cow<'static, str>>),
}

impl std::fmt::Display for ValidateError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("Invalid data occurred")
  }
}

impl std::error::Error for ValidateError {}

impl std::fmt::Debug for ValidateError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ValidateError::Fields(n) => n.fmt(f),
      ValidateError::Messages(n) => f.debug_map().entry(&"_errors", &n).finish(),
    }
  }
}

impl ValidateError {
  #[must_use]
  pub fn field_builder() -> FieldBuilder {
    FieldBuilder::new()
  }

  #[must_use]
  pub fn msg_builder() -> MessageBuilder {
    MessageBuilder::new()
  }

  /// Shorthand for an error with exactly one message on one field.
  #[must_use]
  pub fn single(
    field: impl Into<Cow<'static, str>>,
    message: impl Into<Cow<'static, str>>,
  ) -> Self {
    let mut fields = FieldBuilder::new();
    fields.push_message(field, message);
    fields.build()
  }
}

impl ValidateError {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    match self {
      ValidateError::Fields(n) => n.is_empty(),
      ValidateError::Messages(n) => n.is_empty(),
    }
  }

  /// Messages attached directly to `field`, if any.
  #[must_use]
  pub fn field_messages(&self, field: &str) -> Option<&[Cow<'static, str>]> {
    match self {
      ValidateError::Fields(fields) => match fields.get(field)? {
        ValidateError::Messages(messages) => Some(messages.as_slice()),
        ValidateError::Fields(..) => None,
      },
      ValidateError::Messages(..) => None,
    }
  }

  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() {
      Ok(())
    } else {
      Err(self)
    }
  }
}

impl Serialize for ValidateError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    match self {
      ValidateError::Fields(n) => serialize_index_map(n, serializer),
      ValidateError::Messages(n) => {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("_errors", &n)?;
        map.end()
      }
    }
  }
}
