//! Repository trait for click event storage.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for click tracking.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Stores a click and increments the link's `click_count`.
    ///
    /// Both writes happen atomically: either the click row exists and the
    /// counter reflects it, or neither change is visible.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the link no longer exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_click(&self, click: NewClick) -> Result<Click, AppError>;

    /// Returns every click of a link, newest first.
    async fn list_clicks(&self, link_id: i64) -> Result<Vec<Click>, AppError>;

    /// Returns at most `limit` clicks of a link, newest first.
    async fn recent_clicks(&self, link_id: i64, limit: i64) -> Result<Vec<Click>, AppError>;
}
