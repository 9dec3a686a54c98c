use std::{fmt::Debug, hash::Hash};

use crate::internal::Sealed;

/// Table an [`Id`](super::Id) points into. Only the markers below
/// exist.
pub trait Marker: Sealed + Debug + Copy + Ord + Hash + Send + Sync + 'static {}

macro_rules! markers {
  { $( $(#[$meta:meta])* $ident:ident, )* } => {$(
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct $ident;
    impl Sealed for $ident {}
    impl Marker for $ident {}
  )*};
}

markers! {
  /// Untyped, for code that does not care which table.
  AnyMarker,
  CommentMarker,
  FollowMarker,
  GroupMarker,
  PostMarker,
  UserMarker,
}
