//! DTOs for the link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use validator::Validate;

use crate::api::dto::clicks::ClickInfo;
use crate::domain::entities::{Link, LinkPatch};
use crate::utils::slug::SLUG_PATTERN;

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    #[validate(length(min = 3, max = 50, message = "Slug must be 3-50 characters"))]
    #[validate(regex(
        path = "*SLUG_PATTERN",
        message = "Slug can only contain letters, numbers, hyphens, and underscores"
    ))]
    pub slug: Option<String>,

    #[validate(length(max = 100, message = "Title must be at most 100 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Request body for `PUT /api/links/{id}`.
///
/// Only provided fields change. For `title` and `description`, an explicit
/// `null` clears the value while an absent field leaves it unchanged.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub url: Option<String>,

    #[validate(length(min = 3, max = 50, message = "Slug must be 3-50 characters"))]
    #[validate(regex(
        path = "*SLUG_PATTERN",
        message = "Slug can only contain letters, numbers, hyphens, and underscores"
    ))]
    pub slug: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub title: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,

    pub is_active: Option<bool>,
}

impl From<UpdateLinkRequest> for LinkPatch {
    fn from(req: UpdateLinkRequest) -> Self {
        LinkPatch {
            long_url: req.url,
            slug: req.slug,
            title: req.title,
            description: req.description,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub slug: String,
    pub short_url: String,
    pub long_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            slug: link.slug,
            short_url,
            long_url: link.long_url,
            title: link.title,
            description: link.description,
            is_active: link.is_active,
            click_count: link.click_count,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// A link with its latest clicks.
#[derive(Debug, Serialize)]
pub struct LinkDetailResponse {
    #[serde(flatten)]
    pub link: LinkResponse,
    pub recent_clicks: Vec<ClickInfo>,
}

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub items: Vec<LinkResponse>,
    pub total: usize,
}
