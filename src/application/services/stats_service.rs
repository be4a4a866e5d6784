//! Click recording and analytics service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::click_analytics::{self, ClickSummary, RECENT_LIMIT};
use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Service for the click write path and the summary read path.
pub struct StatsService<R: ClickRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ClickRepository + ?Sized> StatsService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Records one click and bumps the link's counter in the same write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the link does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn record_click(&self, click: NewClick) -> Result<Click, AppError> {
        let link_id = click.link_id;
        let click = self.repository.record_click(click).await?;
        debug!(link_id, click_id = click.id, "Click recorded");
        Ok(click)
    }

    /// Returns the latest clicks of a link, newest first.
    pub async fn recent_clicks(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        self.repository
            .recent_clicks(link_id, RECENT_LIMIT as i64)
            .await
    }

    /// Summarizes the full click history of a link as of now.
    pub async fn summary(&self, link_id: i64) -> Result<ClickSummary, AppError> {
        self.summary_as_of(link_id, Utc::now()).await
    }

    pub async fn summary_as_of(
        &self,
        link_id: i64,
        as_of: DateTime<Utc>,
    ) -> Result<ClickSummary, AppError> {
        let clicks = self.repository.list_clicks(link_id).await?;
        Ok(click_analytics::summarize(&clicks, as_of))
    }
}
