use sqlx::FromRow;

use crate::{
  database::{error::ErrorExt, Connection, Result},
  types::{
    id::GroupId,
    view::{GroupSummary, GroupView},
  },
};

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Group {
  pub id: GroupId,
  pub title: String,
  pub slug: String,
  pub description: String,
}

impl std::fmt::Display for Group {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.title)
  }
}

impl Group {
  #[tracing::instrument(skip(conn), name = "db.groups.by_id")]
  pub async fn by_id(conn: &mut Connection, id: GroupId) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>(r#"SELECT * FROM "groups" WHERE id = ?"#)
      .bind(id)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip(conn), name = "db.groups.by_slug")]
  pub async fn by_slug(conn: &mut Connection, slug: &str) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>(r#"SELECT * FROM "groups" WHERE slug = ?"#)
      .bind(slug)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  /// Every group, for the group picker of the post form.
  #[tracing::instrument(skip(conn), name = "db.groups.all")]
  pub async fn all(conn: &mut Connection) -> Result<Vec<Self>> {
    sqlx::query_as::<_, Self>(r#"SELECT * FROM "groups" ORDER BY title, id"#)
      .fetch_all(conn)
      .await
      .into_db_error()
  }

  /// Posts of the deleted group stay, with their group cleared.
  #[tracing::instrument(skip(conn), name = "db.groups.delete")]
  pub async fn delete(conn: &mut Connection, id: GroupId) -> Result<bool> {
    let result = sqlx::query(r#"DELETE FROM "groups" WHERE id = ?"#)
      .bind(id)
      .execute(conn)
      .await
      .into_db_error()?;

    Ok(result.rows_affected() > 0)
  }

  #[must_use]
  pub fn to_view(&self) -> GroupView {
    GroupView {
      id: self.id,
      title: self.title.clone(),
      slug: self.slug.clone(),
      description: self.description.clone(),
    }
  }

  #[must_use]
  pub fn to_summary(&self) -> GroupSummary {
    GroupSummary {
      id: self.id,
      title: self.title.clone(),
      slug: self.slug.clone(),
    }
  }
}

/// Groups are created by administrators, outside of the public routes.
pub struct InsertGroup<'a> {
  pub title: &'a str,
  pub slug: &'a str,
  pub description: &'a str,
}

impl InsertGroup<'_> {
  #[tracing::instrument(skip_all, name = "db.groups.insert")]
  pub async fn insert(&self, conn: &mut Connection) -> Result<Group> {
    sqlx::query_as::<_, Group>(
      r#"INSERT INTO "groups" (title, slug, description)
         VALUES (?, ?, ?)
         RETURNING *"#,
    )
    .bind(self.title)
    .bind(self.slug)
    .bind(self.description)
    .fetch_one(conn)
    .await
    .into_db_error()
  }
}
