use chrono::{NaiveDateTime, Utc};
use sqlx::FromRow;

use crate::{
  database::{error::ErrorExt, Connection, Result},
  types::{id::UserId, view::AuthorView},
};

/// Local record of an account owned by the identity layer.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct User {
  pub id: UserId,
  pub created_at: NaiveDateTime,
  pub username: String,
}

impl User {
  #[tracing::instrument(skip(conn), name = "db.users.by_id")]
  pub async fn by_id(conn: &mut Connection, id: UserId) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE id = ?"#)
      .bind(id)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip(conn), name = "db.users.by_name")]
  pub async fn by_name(conn: &mut Connection, username: &str) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE username = ?"#)
      .bind(username)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip(conn), name = "db.users.insert")]
  pub async fn insert(conn: &mut Connection, username: &str) -> Result<Self> {
    sqlx::query_as::<_, Self>(
      r#"INSERT INTO "users" (created_at, username)
         VALUES (?, ?)
         RETURNING *"#,
    )
    .bind(Utc::now().naive_utc())
    .bind(username)
    .fetch_one(conn)
    .await
    .into_db_error()
  }

  /// Deletes the user together with their posts, comments and
  /// follow edges.
  #[tracing::instrument(skip(conn), name = "db.users.delete")]
  pub async fn delete(conn: &mut Connection, id: UserId) -> Result<bool> {
    let result = sqlx::query(r#"DELETE FROM "users" WHERE id = ?"#)
      .bind(id)
      .execute(conn)
      .await
      .into_db_error()?;

    Ok(result.rows_affected() > 0)
  }

  #[must_use]
  pub fn to_author(&self) -> AuthorView {
    AuthorView {
      id: self.id,
      username: self.username.clone(),
    }
  }
}
