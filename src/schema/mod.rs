//! Rows of every table and the queries that read or write them.
//! Functions take a [`Connection`] so callers decide which pool (or
//! transaction) the statement runs on.
//!
//! [`Connection`]: crate::database::Connection

mod comment;
mod follow;
mod group;
pub(crate) mod post;
mod user;

pub use comment::{Comment, InsertComment};
pub use follow::Follow;
pub use group::{Group, InsertGroup};
pub use post::{EditPost, InsertPost, Post};
pub use user::User;

/// Length of the short label rows show in logs and admin listings.
pub const LABEL_LENGTH: usize = 15;

pub(crate) fn label(text: &str) -> &str {
  match text.char_indices().nth(LABEL_LENGTH) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}
