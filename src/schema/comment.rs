use chrono::{NaiveDateTime, Utc};
use sqlx::FromRow;

use crate::{
  database::{error::ErrorExt, Connection, Result},
  types::{
    id::{CommentId, PostId, UserId},
    view::{AuthorView, CommentView},
  },
};

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Comment {
  pub id: CommentId,
  pub created_at: NaiveDateTime,
  pub post_id: PostId,
  pub author_id: UserId,
  pub text: String,
}

impl std::fmt::Display for Comment {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(super::label(&self.text))
  }
}

#[derive(Debug, FromRow)]
struct CommentViewRow {
  id: CommentId,
  text: String,
  created_at: NaiveDateTime,
  author_id: UserId,
  author_username: String,
}

impl Comment {
  /// Comments of a post with their authors, newest first.
  #[tracing::instrument(skip(conn), name = "db.comments.for_post")]
  pub async fn views_for_post(conn: &mut Connection, post_id: PostId) -> Result<Vec<CommentView>> {
    let rows = sqlx::query_as::<_, CommentViewRow>(
      r#"SELECT c.id, c.text, c.created_at, c.author_id, u.username AS author_username
         FROM comments c
         JOIN "users" u ON u.id = c.author_id
         WHERE c.post_id = ?
         ORDER BY c.created_at DESC, c.id DESC"#,
    )
    .bind(post_id)
    .fetch_all(conn)
    .await
    .into_db_error()?;

    Ok(
      rows
        .into_iter()
        .map(|row| CommentView {
          id: row.id,
          text: row.text,
          created_at: row.created_at,
          author: AuthorView {
            id: row.author_id,
            username: row.author_username,
          },
        })
        .collect(),
    )
  }

  #[tracing::instrument(skip(conn), name = "db.comments.count_for_post")]
  pub async fn count_for_post(conn: &mut Connection, post_id: PostId) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = ?")
      .bind(post_id)
      .fetch_one(conn)
      .await
      .into_db_error()
  }
}

pub struct InsertComment<'a> {
  pub post_id: PostId,
  pub author_id: UserId,
  pub text: &'a str,
}

impl InsertComment<'_> {
  #[tracing::instrument(skip_all, name = "db.comments.insert")]
  pub async fn insert(&self, conn: &mut Connection) -> Result<Comment> {
    sqlx::query_as::<_, Comment>(
      r"INSERT INTO comments (created_at, post_id, author_id, text)
        VALUES (?, ?, ?, ?)
        RETURNING *",
    )
    .bind(Utc::now().naive_utc())
    .bind(self.post_id)
    .bind(self.author_id)
    .bind(self.text)
    .fetch_one(conn)
    .await
    .into_db_error()
  }
}
