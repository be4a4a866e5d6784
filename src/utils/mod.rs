//! Utility functions shared by the HTTP and service layers.
//!
//! - [`slug`] - Custom slug and link metadata validation
//! - [`url_normalizer`] - Destination URL normalization
//! - [`client_ip`] - Client address resolution behind optional proxies

pub mod client_ip;
pub mod slug;
pub mod url_normalizer;
