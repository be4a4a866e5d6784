//! Destination URL validation and normalization.
//!
//! Produces one canonical spelling per destination: lowercase host, no fragment,
//! no default port. Only absolute `http`/`https` URLs with a host are accepted.

use url::Url;

/// Longest destination URL accepted after normalization.
pub const MAX_URL_LEN: usize = 2048;

#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,

    #[error("URL exceeds {MAX_URL_LEN} characters")]
    TooLong,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Normalizes a destination URL to its canonical form.
///
/// Surrounding whitespace is ignored. Query and path are kept verbatim.
///
/// # Errors
///
/// Fails for malformed input, non-HTTP(S) schemes, host-less URLs and results
/// longer than [`MAX_URL_LEN`].
///
/// ```ignore
/// assert_eq!(
///     normalize_url("HTTPS://Example.COM:443/Path#top").unwrap(),
///     "https://example.com/Path"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url = Url::parse(input.trim())
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlNormalizationError::MissingHost)?
        .to_ascii_lowercase();
    url.set_host(Some(&host))
        .map_err(|e| UrlNormalizationError::NormalizationFailed(e.to_string()))?;

    url.set_fragment(None);

    // parsing already strips a port equal to the scheme default
    let normalized = url.to_string();
    if normalized.len() > MAX_URL_LEN {
        return Err(UrlNormalizationError::TooLong);
    }
    Ok(normalized)
}
