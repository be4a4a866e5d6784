//! Validation rules for caller-supplied slugs and link metadata.

use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::error::AppError;

pub const SLUG_MIN_LEN: usize = 3;
pub const SLUG_MAX_LEN: usize = 50;
pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// Path segments that collide with application routes or well-known files.
///
/// Compared case-insensitively.
pub const RESERVED_SLUGS: &[&str] = &[
    "api", "users", "admin", "dashboard", "login", "logout", "register", "profile", "settings",
    "stats", "analytics", "docs", "help", "support", "about", "contact", "privacy", "terms",
    "sitemap", "robots", "favicon", "static", "assets", "images", "css", "js", "fonts", "health",
    "status", "r",
];

/// Allowed slug characters, also used by request DTO validation.
pub static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

pub fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(slug))
}

/// Validates a custom slug.
///
/// # Rules
///
/// - Length: 3-50 characters
/// - Allowed characters: letters, digits, `_` and `-`
/// - Not a reserved word
///
/// # Errors
///
/// Returns [`AppError::Validation`] naming the violated rule.
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    let len = slug.chars().count();
    if !(SLUG_MIN_LEN..=SLUG_MAX_LEN).contains(&len) {
        return Err(AppError::bad_request(
            format!("Slug must be {SLUG_MIN_LEN}-{SLUG_MAX_LEN} characters"),
            json!({ "field": "slug", "provided_length": len }),
        ));
    }

    if !SLUG_PATTERN.is_match(slug) {
        return Err(AppError::bad_request(
            "Slug can only contain letters, numbers, hyphens, and underscores",
            json!({ "field": "slug", "slug": slug }),
        ));
    }

    if is_reserved(slug) {
        return Err(AppError::bad_request(
            "This slug is reserved",
            json!({ "field": "slug", "slug": slug }),
        ));
    }

    Ok(())
}

/// Checks title and description lengths.
pub fn validate_link_metadata(
    title: Option<&str>,
    description: Option<&str>,
) -> Result<(), AppError> {
    check_max("title", title, TITLE_MAX_LEN)?;
    check_max("description", description, DESCRIPTION_MAX_LEN)
}

fn check_max(field: &str, value: Option<&str>, max: usize) -> Result<(), AppError> {
    match value {
        Some(v) if v.chars().count() > max => Err(AppError::bad_request(
            format!("{field} must be at most {max} characters"),
            json!({ "field": field, "max_length": max }),
        )),
        _ => Ok(()),
    }
}
