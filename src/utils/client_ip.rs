//! Client address resolution for rate limiting and click records.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Resolves the requesting client's address.
///
/// With `behind_proxy` the first valid entry of `X-Forwarded-For` wins, then
/// `X-Real-IP`. The socket peer address is used otherwise and as the last resort.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
) -> Option<IpAddr> {
    if behind_proxy {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .and_then(|first| first.trim().parse().ok());
        let real = || header_str(headers, "x-real-ip").and_then(|v| v.trim().parse().ok());

        if let Some(ip) = forwarded.or_else(real) {
            return Some(ip);
        }
    }

    peer.map(|addr| addr.ip())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
