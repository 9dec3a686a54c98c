use serde::de::{Error as DeError, Unexpected};
use std::{
  fmt::{Debug, Display},
  hash::Hash,
  marker::PhantomData,
  num::NonZeroU64,
  str::FromStr,
};
use thiserror::Error;

use self::marker::Marker;

pub mod marker;

pub type CommentId = Id<marker::CommentMarker>;
pub type FollowId = Id<marker::FollowMarker>;
pub type GroupId = Id<marker::GroupMarker>;
pub type PostId = Id<marker::PostMarker>;
pub type UserId = Id<marker::UserMarker>;

/// SQLite row id tagged with the table it belongs to, so a post id
/// cannot be passed where a user id is expected.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id<T: Marker> {
  value: NonZeroU64,
  table: PhantomData<T>,
}

impl<T: Marker> Id<T> {
  /// # Panics
  ///
  /// Row ids start at 1, so 0 panics.
  #[must_use]
  #[track_caller]
  pub const fn new(n: u64) -> Self {
    match Self::new_checked(n) {
      Some(id) => id,
      None => panic!("row id must not be 0"),
    }
  }

  #[must_use]
  pub const fn new_checked(n: u64) -> Option<Self> {
    match NonZeroU64::new(n) {
      Some(n) => Some(Self::from_nonzero(n)),
      None => None,
    }
  }

  #[must_use]
  pub const fn from_nonzero(value: NonZeroU64) -> Self {
    Self {
      value,
      table: PhantomData,
    }
  }

  #[must_use]
  pub const fn get(self) -> u64 {
    self.value.get()
  }

  #[must_use]
  pub const fn cast<M: Marker>(self) -> Id<M> {
    Id::from_nonzero(self.value)
  }
}

/// Path segments and form values that are not a positive integer.
#[derive(Debug, Error)]
#[error("invalid id {0:?}")]
pub struct ParseIdError(String);

impl<T: Marker> FromStr for Id<T> {
  type Err = ParseIdError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.parse::<u64>()
      .ok()
      .and_then(Self::new_checked)
      .ok_or_else(|| ParseIdError(s.to_string()))
  }
}

impl<T: Marker> Debug for Id<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let marker = std::any::type_name::<T>();
    let marker = marker.rsplit("::").next().unwrap_or(marker);
    let table = marker.strip_suffix("Marker").unwrap_or(marker);
    write!(f, "{table}Id({})", self.value)
  }
}

impl<T: Marker> Display for Id<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    Display::fmt(&self.value, f)
  }
}

impl<T: Marker> Hash for Id<T> {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    self.value.hash(state);
  }
}

impl<T: Marker> serde::Serialize for Id<T> {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_u64(self.get())
  }
}

impl<'de, T: Marker> serde::Deserialize<'de> for Id<T> {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    struct Visitor<T>(PhantomData<T>);

    impl<T: Marker> serde::de::Visitor<'_> for Visitor<T> {
      type Value = Id<T>;

      fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a positive row id")
      }

      fn visit_u64<E: DeError>(self, v: u64) -> Result<Self::Value, E> {
        Id::new_checked(v).ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
      }

      fn visit_i64<E: DeError>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
          .ok()
          .and_then(Id::new_checked)
          .ok_or_else(|| E::invalid_value(Unexpected::Signed(v), &self))
      }

      // form values and path segments arrive as text
      fn visit_str<E: DeError>(self, v: &str) -> Result<Self::Value, E> {
        v.parse()
          .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
      }
    }

    deserializer.deserialize_any(Visitor(PhantomData))
  }
}

impl<'q, T: Marker> sqlx::Encode<'q, sqlx::Sqlite> for Id<T> {
  fn encode_by_ref(
    &self,
    buf: &mut <sqlx::Sqlite as sqlx::database::HasArguments<'q>>::ArgumentBuffer,
  ) -> sqlx::encode::IsNull {
    match i64::try_from(self.get()) {
      Ok(value) => <i64 as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&value, buf),
      // outside of SQLite's INTEGER range, so no row can have it
      Err(..) => sqlx::encode::IsNull::Yes,
    }
  }
}

impl<'r, T: Marker> sqlx::Decode<'r, sqlx::Sqlite> for Id<T> {
  fn decode(
    value: <sqlx::Sqlite as sqlx::database::HasValueRef<'r>>::ValueRef,
  ) -> Result<Self, sqlx::error::BoxDynError> {
    let value = <i64 as sqlx::Decode<'r, sqlx::Sqlite>>::decode(value)?;
    let value = u64::try_from(value)?;
    Self::new_checked(value).ok_or_else(|| "row id must not be 0".into())
  }
}

impl<T: Marker> sqlx::Type<sqlx::Sqlite> for Id<T> {
  fn type_info() -> <sqlx::Sqlite as sqlx::Database>::TypeInfo {
    <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
  }

  fn compatible(ty: &<sqlx::Sqlite as sqlx::Database>::TypeInfo) -> bool {
    <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
  }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::id::marker::AnyMarker;
  use serde_test::Token;
  use static_assertions::{assert_eq_size, assert_impl_all, assert_not_impl_any};

  assert_eq_size!(Option<Id<AnyMarker>>, u64);
  assert_impl_all!(PostId:
    Debug, Display, Copy, Send, Sync, Hash, serde::Serialize,
    sqlx::Type<sqlx::Sqlite>, sqlx::Encode<'static, sqlx::Sqlite>
  );
  assert_not_impl_any!(PostId: PartialEq<UserId>);

  #[test]
  #[should_panic(expected = "row id must not be 0")]
  fn test_zero_panics() {
    _ = PostId::new(0);
  }

  #[test]
  fn test_parse() {
    assert_eq!("42".parse::<PostId>().unwrap(), PostId::new(42));
    for invalid in ["0", "-1", "abc", "", "4.2"] {
      assert!(invalid.parse::<PostId>().is_err(), "{invalid:?}");
    }
  }

  #[test]
  fn test_fmt() {
    assert_eq!(PostId::new(15).to_string(), "15");
    assert_eq!(format!("{:?}", PostId::new(15)), "PostId(15)");
    assert_eq!(format!("{:?}", Id::<AnyMarker>::new(7)), "AnyId(7)");
  }

  fn raw_of<T: Marker>(id: &Id<T>) -> u64 {
    let copy = *id;
    copy.get()
  }

  #[test]
  fn test_generic_ids_are_copy() {
    assert_eq!(raw_of(&CommentId::new(3)), 3);
    assert_eq!(raw_of(&Id::<AnyMarker>::new(4)), 4);
  }

  #[test]
  fn test_cast_keeps_value() {
    let id = Id::<AnyMarker>::new(9).cast::<marker::GroupMarker>();
    assert_eq!(id, GroupId::new(9));
  }

  #[test]
  fn test_serde_impl() {
    let id = UserId::new(1234);
    serde_test::assert_ser_tokens(&id, &[Token::U64(1234)]);
    serde_test::assert_de_tokens(&id, &[Token::U64(1234)]);
    serde_test::assert_de_tokens(&id, &[Token::I64(1234)]);
    serde_test::assert_de_tokens(&id, &[Token::Str("1234")]);
    serde_test::assert_de_tokens_error::<UserId>(
      &[Token::U64(0)],
      "invalid value: integer `0`, expected a positive row id",
    );
  }
}
