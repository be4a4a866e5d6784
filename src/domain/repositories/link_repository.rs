//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// Owner-scoped lookups return `None` for links belonging to someone else, so
/// callers cannot tell a foreign link apart from a missing one.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] with `constraint = "links_slug_key"` in the
    /// details when the slug is already stored.
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Returns whether any link uses `slug`, regardless of owner or state.
    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError>;

    /// Finds a link by slug, regardless of owner or state.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by id if it belongs to `user_id`.
    async fn find_for_owner(&self, id: i64, user_id: i64) -> Result<Option<Link>, AppError>;

    /// Lists the owner's links, newest first.
    async fn list_for_owner(&self, user_id: i64) -> Result<Vec<Link>, AppError>;

    /// Applies a patch to an owned link.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` with the updated row
    /// - `Ok(None)` if the link does not exist or belongs to another user
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a changed slug collides at write time.
    async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: LinkPatch,
    ) -> Result<Option<Link>, AppError>;

    /// Deletes an owned link together with its clicks.
    ///
    /// Returns the removed link, or `None` if nothing matched.
    async fn delete(&self, id: i64, user_id: i64) -> Result<Option<Link>, AppError>;

    /// Checks that the store answers queries.
    async fn ping(&self) -> Result<(), AppError>;
}
