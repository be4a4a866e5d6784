//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};

/// An immutable click event recorded when a short link is followed.
///
/// Client metadata is optional; `country` and `city` are filled in by the
/// geolocation collaborator when it knows the requester's address.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl Click {
    /// Creates a click without any client metadata.
    pub fn bare(id: i64, link_id: i64, clicked_at: DateTime<Utc>) -> Self {
        Self {
            id,
            link_id,
            clicked_at,
            ip: None,
            user_agent: None,
            referer: None,
            country: None,
            city: None,
        }
    }
}

/// Input data for recording a new click event.
///
/// The timestamp is assigned by the store at insertion time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewClick {
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl NewClick {
    pub fn into_click(self, id: i64, clicked_at: DateTime<Utc>) -> Click {
        Click {
            id,
            link_id: self.link_id,
            clicked_at,
            ip: self.ip,
            user_agent: self.user_agent,
            referer: self.referer,
            country: self.country,
            city: self.city,
        }
    }
}
