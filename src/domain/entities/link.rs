//! Link entity representing a slug to destination mapping.

use chrono::{DateTime, Utc};

/// A shortened link owned by a user.
///
/// `slug` is unique across all links; `click_count` is the cumulative number
/// of recorded redirects.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub user_id: i64,
    pub slug: String,
    pub long_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Creates an active link with no clicks, as returned right after insertion.
    pub fn new(
        id: i64,
        user_id: i64,
        slug: String,
        long_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            slug,
            long_url,
            title: None,
            description: None,
            is_active: true,
            click_count: 0,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub user_id: i64,
    pub slug: String,
    pub long_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged. For `title` and `description`,
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub long_url: Option<String>,
    pub slug: Option<String>,
    pub title: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies the patch to an in-memory link, bumping `updated_at`.
    pub fn apply_to(&self, link: &mut Link, now: DateTime<Utc>) {
        if let Some(url) = &self.long_url {
            link.long_url = url.clone();
        }
        if let Some(slug) = &self.slug {
            link.slug = slug.clone();
        }
        if let Some(title) = &self.title {
            link.title = title.clone();
        }
        if let Some(description) = &self.description {
            link.description = description.clone();
        }
        if let Some(active) = self.is_active {
            link.is_active = active;
        }
        link.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            7,
            "abc123".to_string(),
            "https://example.com".to_string(),
            now,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.slug, "abc123");
        assert!(link.is_active);
        assert_eq!(link.click_count, 0);
        assert_eq!(link.updated_at, now);
        assert!(link.is_owned_by(7));
        assert!(!link.is_owned_by(8));
    }

    #[test]
    fn test_patch_apply_clears_and_sets() {
        let created = Utc::now();
        let mut link = Link::new(1, 7, "old".into(), "https://a.com/".into(), created);
        link.title = Some("Title".into());

        let patch = LinkPatch {
            slug: Some("new-slug".into()),
            title: Some(None),
            description: Some(Some("Described".into())),
            is_active: Some(false),
            ..Default::default()
        };
        let later = created + chrono::Duration::seconds(5);
        patch.apply_to(&mut link, later);

        assert_eq!(link.slug, "new-slug");
        assert_eq!(link.long_url, "https://a.com/");
        assert!(link.title.is_none());
        assert_eq!(link.description.as_deref(), Some("Described"));
        assert!(!link.is_active);
        assert_eq!(link.updated_at, later);
    }

    #[test]
    fn test_empty_patch() {
        assert!(LinkPatch::default().is_empty());
        let patch = LinkPatch {
            is_active: Some(true),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
