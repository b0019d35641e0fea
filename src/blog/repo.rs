use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Blog post record. Slug is unique and is the public lookup key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub author: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Blog {
    pub async fn list(db: &PgPool) -> Result<Vec<Blog>, sqlx::Error> {
        sqlx::query_as::<_, Blog>(
            r#"
            SELECT id, title, slug, author, content, category, tags, thumbnail_url, created_at
            FROM blogs
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_by_slug(db: &PgPool, slug: &str) -> Result<Option<Blog>, sqlx::Error> {
        sqlx::query_as::<_, Blog>(
            r#"
            SELECT id, title, slug, author, content, category, tags, thumbnail_url, created_at
            FROM blogs
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(db)
        .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        title: &str,
        slug: &str,
        author: &str,
        content: &str,
        category: &str,
        tags: &[String],
        thumbnail_url: Option<&str>,
    ) -> Result<Blog, sqlx::Error> {
        sqlx::query_as::<_, Blog>(
            r#"
            INSERT INTO blogs (title, slug, author, content, category, tags, thumbnail_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, slug, author, content, category, tags, thumbnail_url, created_at
            "#,
        )
        .bind(title)
        .bind(slug)
        .bind(author)
        .bind(content)
        .bind(category)
        .bind(tags)
        .bind(thumbnail_url)
        .fetch_one(db)
        .await
    }

    /// Partial update; absent fields keep their stored values.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: Option<&str>,
        content: Option<&str>,
        category: Option<&str>,
        tags: Option<&[String]>,
    ) -> Result<Option<Blog>, sqlx::Error> {
        sqlx::query_as::<_, Blog>(
            r#"
            UPDATE blogs
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                category = COALESCE($4, category),
                tags = COALESCE($5, tags)
            WHERE id = $1
            RETURNING id, title, slug, author, content, category, tags, thumbnail_url, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(category)
        .bind(tags)
        .fetch_optional(db)
        .await
    }

    pub async fn delete_by_id(db: &PgPool, id: Uuid) -> Result<Option<Blog>, sqlx::Error> {
        sqlx::query_as::<_, Blog>(
            r#"
            DELETE FROM blogs
            WHERE id = $1
            RETURNING id, title, slug, author, content, category, tags, thumbnail_url, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }
}
