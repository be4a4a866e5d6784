//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, user_id, slug, long_url, title, description, is_active, \
                            click_count, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    user_id: i64,
    slug: String,
    long_url: String,
    title: Option<String>,
    description: Option<String>,
    is_active: bool,
    click_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            id: r.id,
            user_id: r.user_id,
            slug: r.slug,
            long_url: r.long_url,
            title: r.title,
            description: r.description,
            is_active: r.is_active,
            click_count: r.click_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Slug uniqueness is enforced by the `links_slug_key` constraint; violations
/// surface as [`AppError::Conflict`] carrying the constraint name.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            "INSERT INTO links (user_id, slug, long_url, title, description) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {LINK_COLUMNS}"
        );
        let row: LinkRow = sqlx::query_as(&sql)
            .bind(new_link.user_id)
            .bind(&new_link.slug)
            .bind(&new_link.long_url)
            .bind(&new_link.title)
            .bind(&new_link.description)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM links WHERE slug = $1)")
            .bind(slug)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(exists)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE slug = $1");
        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(slug)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn find_for_owner(&self, id: i64, user_id: i64) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1 AND user_id = $2");
        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn list_for_owner(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let rows: Vec<LinkRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: LinkPatch,
    ) -> Result<Option<Link>, AppError> {
        let sql = format!(
            "UPDATE links SET \
                long_url = COALESCE($3, long_url), \
                slug = COALESCE($4, slug), \
                title = CASE WHEN $5 THEN $6 ELSE title END, \
                description = CASE WHEN $7 THEN $8 ELSE description END, \
                is_active = COALESCE($9, is_active), \
                updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {LINK_COLUMNS}"
        );
        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(user_id)
            .bind(patch.long_url)
            .bind(patch.slug)
            .bind(patch.title.is_some())
            .bind(patch.title.flatten())
            .bind(patch.description.is_some())
            .bind(patch.description.flatten())
            .bind(patch.is_active)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<Option<Link>, AppError> {
        let sql =
            format!("DELETE FROM links WHERE id = $1 AND user_id = $2 RETURNING {LINK_COLUMNS}");
        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
