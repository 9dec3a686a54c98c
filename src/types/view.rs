use chrono::NaiveDateTime;
use serde::Serialize;

use super::id::{CommentId, GroupId, PostId, UserId};

/// Public part of a user, as shown next to their posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorView {
  pub id: UserId,
  pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
  pub id: GroupId,
  pub title: String,
  pub slug: String,
  pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
  pub id: GroupId,
  pub title: String,
  pub slug: String,
}

/// A post with its author and group already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
  pub id: PostId,
  pub text: String,
  pub created_at: NaiveDateTime,
  pub image: Option<String>,
  pub author: AuthorView,
  pub group: Option<GroupSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
  pub id: CommentId,
  pub text: String,
  pub created_at: NaiveDateTime,
  pub author: AuthorView,
}
