use chrono::{NaiveDateTime, Utc};
use sqlx::FromRow;

use crate::{
  database::{error::ErrorExt, Connection, Result},
  types::id::{FollowId, UserId},
};

/// Directed edge: `user_id` wants the posts of `author_id` in their
/// following feed.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Follow {
  pub id: FollowId,
  pub created_at: NaiveDateTime,
  pub user_id: UserId,
  pub author_id: UserId,
}

impl Follow {
  /// Creates the edge unless it exists already. Following yourself is
  /// a no-op. Returns whether a new edge was written.
  ///
  /// Duplicates are resolved by the `(user_id, author_id)` unique
  /// constraint, so concurrent callers cannot create two edges.
  #[tracing::instrument(skip(conn), name = "db.follows.follow")]
  pub async fn follow(conn: &mut Connection, user_id: UserId, author_id: UserId) -> Result<bool> {
    if user_id == author_id {
      tracing::debug!("ignoring self-follow");
      return Ok(false);
    }

    let result = sqlx::query(
      r"INSERT INTO follows (created_at, user_id, author_id)
        VALUES (?, ?, ?)
        ON CONFLICT (user_id, author_id) DO NOTHING",
    )
    .bind(Utc::now().naive_utc())
    .bind(user_id)
    .bind(author_id)
    .execute(conn)
    .await
    .into_db_error()?;

    Ok(result.rows_affected() > 0)
  }

  /// Removes the edge if present. Returns whether one was removed.
  #[tracing::instrument(skip(conn), name = "db.follows.unfollow")]
  pub async fn unfollow(conn: &mut Connection, user_id: UserId, author_id: UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM follows WHERE user_id = ? AND author_id = ?")
      .bind(user_id)
      .bind(author_id)
      .execute(conn)
      .await
      .into_db_error()?;

    Ok(result.rows_affected() > 0)
  }

  /// Anonymous visitors follow nobody.
  #[tracing::instrument(skip(conn), name = "db.follows.is_following")]
  pub async fn is_following(
    conn: &mut Connection,
    user_id: Option<UserId>,
    author_id: UserId,
  ) -> Result<bool> {
    let Some(user_id) = user_id else {
      return Ok(false);
    };

    sqlx::query_scalar::<_, bool>(
      "SELECT EXISTS (SELECT 1 FROM follows WHERE user_id = ? AND author_id = ?)",
    )
    .bind(user_id)
    .bind(author_id)
    .fetch_one(conn)
    .await
    .into_db_error()
  }

  /// Authors `user_id` follows, oldest edge first.
  #[tracing::instrument(skip(conn), name = "db.follows.authors_of")]
  pub async fn authors_of(conn: &mut Connection, user_id: UserId) -> Result<Vec<UserId>> {
    sqlx::query_scalar::<_, UserId>(
      "SELECT author_id FROM follows WHERE user_id = ? ORDER BY created_at, id",
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
    .into_db_error()
  }

  #[tracing::instrument(skip(conn), name = "db.follows.count")]
  pub async fn count(conn: &mut Connection, user_id: UserId, author_id: UserId) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(
      "SELECT COUNT(*) FROM follows WHERE user_id = ? AND author_id = ?",
    )
    .bind(user_id)
    .bind(author_id)
    .fetch_one(conn)
    .await
    .into_db_error()
  }
}
