//! DTO for individual click records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Click;

#[derive(Debug, Serialize)]
pub struct ClickInfo {
    pub id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub ip: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl From<Click> for ClickInfo {
    fn from(click: Click) -> Self {
        Self {
            id: click.id,
            clicked_at: click.clicked_at,
            user_agent: click.user_agent,
            referer: click.referer,
            ip: click.ip,
            country: click.country,
            city: click.city,
        }
    }
}
