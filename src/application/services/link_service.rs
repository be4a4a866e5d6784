//! Link management service: creation, lookup, update and deletion.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::domain::slug_allocator::{AllocationError, SlugAllocator};
use crate::error::{AppError, SLUG_UNIQUE_CONSTRAINT};
use crate::utils::slug::{validate_link_metadata, validate_slug};
use crate::utils::url_normalizer::normalize_url;

/// Insert attempts for generated slugs that collide at write time.
pub const MAX_PERSIST_ATTEMPTS: usize = 3;

/// Input for creating a link.
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub url: String,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Result of an update, carrying the slug the link had before it.
#[derive(Debug, Clone)]
pub struct UpdatedLink {
    pub link: Link,
    pub previous_slug: String,
}

impl UpdatedLink {
    pub fn slug_changed(&self) -> bool {
        self.link.slug != self.previous_slug
    }
}

/// Service for the owner-facing link lifecycle and public slug resolution.
///
/// Slugs are allocated through [`SlugAllocator`]; a unique violation on insert is
/// treated as a lost race and retried for generated slugs.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    allocator: SlugAllocator<L>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    pub fn new(link_repository: Arc<L>) -> Self {
        Self {
            allocator: SlugAllocator::new(link_repository.clone()),
            link_repository,
        }
    }

    /// Creates a link owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid URL, slug or metadata.
    /// Returns [`AppError::Conflict`] if the requested slug is taken.
    /// Returns [`AppError::Unavailable`] if generated slugs keep colliding.
    pub async fn create_link(&self, owner_id: i64, input: CreateLink) -> Result<Link, AppError> {
        let long_url = normalize_destination(&input.url)?;
        let custom = input.slug.as_deref().map(str::trim).filter(|s| !s.is_empty());
        if let Some(slug) = custom {
            validate_slug(slug)?;
        }
        validate_link_metadata(input.title.as_deref(), input.description.as_deref())?;

        for attempt in 1..=MAX_PERSIST_ATTEMPTS {
            let slug = self.allocator.allocate(custom).await?;
            let new_link = NewLink {
                user_id: owner_id,
                slug: slug.clone(),
                long_url: long_url.clone(),
                title: input.title.clone(),
                description: input.description.clone(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    info!(link_id = link.id, slug = %link.slug, owner_id, "Link created");
                    return Ok(link);
                }
                Err(e) if e.is_conflict_on(SLUG_UNIQUE_CONSTRAINT) => {
                    if custom.is_some() {
                        return Err(AllocationError::SlugTaken { slug }.into());
                    }
                    warn!(attempt, slug = %slug, "Slug taken between check and insert, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AllocationError::Exhausted {
            attempts: MAX_PERSIST_ATTEMPTS,
        }
        .into())
    }

    /// Lists the owner's links, newest first.
    pub async fn list_links(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_for_owner(owner_id).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or belongs to
    /// another user.
    pub async fn get_link(&self, owner_id: i64, link_id: i64) -> Result<Link, AppError> {
        self.link_repository
            .find_for_owner(link_id, owner_id)
            .await?
            .ok_or_else(|| link_not_found(link_id))
    }

    /// Applies a partial update to an owned link.
    ///
    /// A changed slug goes through the same validation and availability check
    /// as a custom slug on creation.
    pub async fn update_link(
        &self,
        owner_id: i64,
        link_id: i64,
        mut patch: LinkPatch,
    ) -> Result<UpdatedLink, AppError> {
        let current = self.get_link(owner_id, link_id).await?;

        if let Some(url) = patch.long_url.take() {
            patch.long_url = Some(normalize_destination(&url)?);
        }

        patch.slug = match patch.slug.take().map(|s| s.trim().to_string()) {
            Some(slug) if slug != current.slug => {
                validate_slug(&slug)?;
                Some(self.allocator.allocate(Some(&slug)).await?)
            }
            _ => None,
        };

        validate_link_metadata(
            patch.title.as_ref().and_then(Option::as_deref),
            patch.description.as_ref().and_then(Option::as_deref),
        )?;

        if patch.is_empty() {
            return Ok(UpdatedLink {
                previous_slug: current.slug.clone(),
                link: current,
            });
        }

        let new_slug = patch.slug.clone();
        let link = match self.link_repository.update(link_id, owner_id, patch).await {
            Ok(Some(link)) => link,
            Ok(None) => return Err(link_not_found(link_id)),
            Err(e) if e.is_conflict_on(SLUG_UNIQUE_CONSTRAINT) => {
                return Err(AllocationError::SlugTaken {
                    slug: new_slug.unwrap_or_default(),
                }
                .into());
            }
            Err(e) => return Err(e),
        };

        info!(link_id, owner_id, "Link updated");
        Ok(UpdatedLink {
            link,
            previous_slug: current.slug,
        })
    }

    /// Deletes an owned link and returns it.
    pub async fn delete_link(&self, owner_id: i64, link_id: i64) -> Result<Link, AppError> {
        let link = self
            .link_repository
            .delete(link_id, owner_id)
            .await?
            .ok_or_else(|| link_not_found(link_id))?;

        info!(link_id, slug = %link.slug, owner_id, "Link deleted");
        Ok(link)
    }

    /// Looks up the link behind a public slug, whatever its state.
    pub async fn resolve_slug(&self, slug: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "slug": slug })))
    }

    /// Builds the public short URL for a slug.
    pub fn short_url(&self, base_url: &str, slug: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), slug)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }
}

fn normalize_destination(url: &str) -> Result<String, AppError> {
    normalize_url(url).map_err(|e| {
        AppError::bad_request(
            "Invalid URL format",
            json!({ "field": "url", "reason": e.to_string() }),
        )
    })
}

fn link_not_found(link_id: i64) -> AppError {
    AppError::not_found("Link not found", json!({ "id": link_id }))
}
