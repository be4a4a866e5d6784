//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

const CLICK_COLUMNS: &str = "id, link_id, clicked_at, ip, user_agent, referer, country, city";

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    clicked_at: DateTime<Utc>,
    ip: Option<String>,
    user_agent: Option<String>,
    referer: Option<String>,
    country: Option<String>,
    city: Option<String>,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click {
            id: r.id,
            link_id: r.link_id,
            clicked_at: r.clicked_at,
            ip: r.ip,
            user_agent: r.user_agent,
            referer: r.referer,
            country: r.country,
            city: r.city,
        }
    }
}

pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record_click(&self, click: NewClick) -> Result<Click, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO link_clicks (link_id, ip, user_agent, referer, country, city) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {CLICK_COLUMNS}"
        );
        let row: ClickRow = sqlx::query_as(&sql)
            .bind(click.link_id)
            .bind(&click.ip)
            .bind(&click.user_agent)
            .bind(&click.referer)
            .bind(&click.country)
            .bind(&click.city)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE id = $1")
            .bind(click.link_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn list_clicks(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        let sql = format!(
            "SELECT {CLICK_COLUMNS} FROM link_clicks \
             WHERE link_id = $1 ORDER BY clicked_at DESC, id DESC"
        );
        let rows: Vec<ClickRow> = sqlx::query_as(&sql)
            .bind(link_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }

    async fn recent_clicks(&self, link_id: i64, limit: i64) -> Result<Vec<Click>, AppError> {
        let sql = format!(
            "SELECT {CLICK_COLUMNS} FROM link_clicks \
             WHERE link_id = $1 ORDER BY clicked_at DESC, id DESC LIMIT $2"
        );
        let rows: Vec<ClickRow> = sqlx::query_as(&sql)
            .bind(link_id)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }
}
