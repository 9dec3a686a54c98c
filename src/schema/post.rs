use chrono::{NaiveDateTime, Utc};
use sqlx::FromRow;

use crate::{
  database::{error::ErrorExt, Connection, Result},
  types::{
    id::{GroupId, PostId, UserId},
    view::{AuthorView, GroupSummary, PostView},
  },
};

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Post {
  pub id: PostId,
  pub created_at: NaiveDateTime,
  pub text: String,
  pub group_id: Option<GroupId>,
  pub author_id: UserId,
  pub image: Option<String>,
  pub updated_at: Option<NaiveDateTime>,
}

impl std::fmt::Display for Post {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(super::label(&self.text))
  }
}

/// Columns of a post joined with its author and group, in the shape
/// [`PostViewRow`] expects. Callers append filters and ordering.
pub(crate) const POST_VIEW_SELECT: &str = r#"SELECT
    p.id, p.text, p.created_at, p.image,
    p.author_id, u.username AS author_username,
    p.group_id, g.title AS group_title, g.slug AS group_slug
  FROM posts p
  JOIN "users" u ON u.id = p.author_id
  LEFT JOIN "groups" g ON g.id = p.group_id"#;

/// Feed ordering: newest first, ties broken by insertion order.
pub(crate) const POST_VIEW_ORDER: &str = " ORDER BY p.created_at DESC, p.id DESC";

#[derive(Debug, FromRow)]
pub(crate) struct PostViewRow {
  id: PostId,
  text: String,
  created_at: NaiveDateTime,
  image: Option<String>,
  author_id: UserId,
  author_username: String,
  group_id: Option<GroupId>,
  group_title: Option<String>,
  group_slug: Option<String>,
}

impl From<PostViewRow> for PostView {
  fn from(row: PostViewRow) -> Self {
    let group = match (row.group_id, row.group_title, row.group_slug) {
      (Some(id), Some(title), Some(slug)) => Some(GroupSummary { id, title, slug }),
      _ => None,
    };

    PostView {
      id: row.id,
      text: row.text,
      created_at: row.created_at,
      image: row.image,
      author: AuthorView {
        id: row.author_id,
        username: row.author_username,
      },
      group,
    }
  }
}

impl Post {
  #[tracing::instrument(skip(conn), name = "db.posts.by_id")]
  pub async fn by_id(conn: &mut Connection, id: PostId) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>("SELECT * FROM posts WHERE id = ?")
      .bind(id)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  /// Loads the post with author and group resolved in one query.
  #[tracing::instrument(skip(conn), name = "db.posts.view_by_id")]
  pub async fn view_by_id(conn: &mut Connection, id: PostId) -> Result<Option<PostView>> {
    let sql = format!("{POST_VIEW_SELECT} WHERE p.id = ?");
    let row = sqlx::query_as::<_, PostViewRow>(&sql)
      .bind(id)
      .fetch_optional(conn)
      .await
      .into_db_error()?;

    Ok(row.map(PostView::from))
  }

  #[must_use]
  pub fn is_authored_by(&self, user_id: UserId) -> bool {
    self.author_id == user_id
  }
}

pub struct InsertPost<'a> {
  pub author_id: UserId,
  pub text: &'a str,
  pub group_id: Option<GroupId>,
  pub image: Option<&'a str>,
}

impl InsertPost<'_> {
  #[tracing::instrument(skip_all, name = "db.posts.insert")]
  pub async fn insert(&self, conn: &mut Connection) -> Result<Post> {
    sqlx::query_as::<_, Post>(
      r"INSERT INTO posts (created_at, text, group_id, author_id, image)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *",
    )
    .bind(Utc::now().naive_utc())
    .bind(self.text)
    .bind(self.group_id)
    .bind(self.author_id)
    .bind(self.image)
    .fetch_one(conn)
    .await
    .into_db_error()
  }
}

/// Replaces the editable fields of a post. The row is only touched
/// when `author_id` is the post's author.
pub struct EditPost<'a> {
  pub id: PostId,
  pub author_id: UserId,
  pub text: &'a str,
  pub group_id: Option<GroupId>,
  pub image: Option<&'a str>,
}

impl EditPost<'_> {
  #[tracing::instrument(skip_all, name = "db.posts.edit", fields(id = %self.id))]
  pub async fn apply(&self, conn: &mut Connection) -> Result<Option<Post>> {
    sqlx::query_as::<_, Post>(
      r"UPDATE posts
        SET text = ?, group_id = ?, image = ?, updated_at = ?
        WHERE id = ? AND author_id = ?
        RETURNING *",
    )
    .bind(self.text)
    .bind(self.group_id)
    .bind(self.image)
    .bind(Utc::now().naive_utc())
    .bind(self.id)
    .bind(self.author_id)
    .fetch_optional(conn)
    .await
    .into_db_error()
  }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
  use super::*;
  use crate::database::Pool;
  use crate::schema::{Group, InsertGroup, User};

  #[tokio::test]
  async fn test_insert_and_view() {
    let pool = Pool::in_memory().await.unwrap();
    let mut conn = pool.get().await.unwrap();

    let author = User::insert(&mut conn, "auth").await.unwrap();
    let group = InsertGroup {
      title: "Test group",
      slug: "test-slug",
      description: "Test description",
    }
    .insert(&mut conn)
    .await
    .unwrap();

    let post = InsertPost {
      author_id: author.id,
      text: "A post about nothing in particular",
      group_id: Some(group.id),
      image: Some("posts/small.gif"),
    }
    .insert(&mut conn)
    .await
    .unwrap();

    assert_eq!(post.to_string(), "A post about no");
    assert!(post.is_authored_by(author.id));
    assert!(post.updated_at.is_none());

    let view = Post::view_by_id(&mut conn, post.id).await.unwrap().unwrap();
    assert_eq!(view.author, author.to_author());
    assert_eq!(view.group, Some(group.to_summary()));
    assert_eq!(view.image.as_deref(), Some("posts/small.gif"));
    assert!(Post::view_by_id(&mut conn, PostId::new(999)).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_edit_only_by_author() {
    let pool = Pool::in_memory().await.unwrap();
    let mut conn = pool.get().await.unwrap();

    let author = User::insert(&mut conn, "auth").await.unwrap();
    let stranger = User::insert(&mut conn, "stranger").await.unwrap();
    let post = InsertPost {
      author_id: author.id,
      text: "original",
      group_id: None,
      image: None,
    }
    .insert(&mut conn)
    .await
    .unwrap();

    let mut edit = EditPost {
      id: post.id,
      author_id: stranger.id,
      text: "hijacked",
      group_id: None,
      image: None,
    };
    assert!(edit.apply(&mut conn).await.unwrap().is_none());
    let unchanged = Post::by_id(&mut conn, post.id).await.unwrap().unwrap();
    assert_eq!(unchanged.text, "original");

    edit.author_id = author.id;
    edit.text = "edited";
    let edited = edit.apply(&mut conn).await.unwrap().unwrap();
    assert_eq!(edited.text, "edited");
    assert_eq!(edited.created_at, post.created_at);
    assert!(edited.updated_at.is_some());
  }

  #[tokio::test]
  async fn test_group_delete_clears_reference() {
    let pool = Pool::in_memory().await.unwrap();
    let mut conn = pool.get().await.unwrap();

    let author = User::insert(&mut conn, "auth").await.unwrap();
    let group = InsertGroup {
      title: "Doomed",
      slug: "doomed",
      description: "",
    }
    .insert(&mut conn)
    .await
    .unwrap();

    let post = InsertPost {
      author_id: author.id,
      text: "survivor",
      group_id: Some(group.id),
      image: None,
    }
    .insert(&mut conn)
    .await
    .unwrap();

    assert!(Group::delete(&mut conn, group.id).await.unwrap());
    let post = Post::by_id(&mut conn, post.id).await.unwrap().unwrap();
    assert_eq!(post.group_id, None);
    assert_eq!(post.text, "survivor");
  }

  #[tokio::test]
  async fn test_blank_text_rejected_by_store() {
    let pool = Pool::in_memory().await.unwrap();
    let mut conn = pool.get().await.unwrap();

    let author = User::insert(&mut conn, "auth").await.unwrap();
    let result = InsertPost {
      author_id: author.id,
      text: "   ",
      group_id: None,
      image: None,
    }
    .insert(&mut conn)
    .await;
    assert!(result.is_err());
  }
}
