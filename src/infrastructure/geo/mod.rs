//! Client geolocation collaborator.
//!
//! The redirect path asks a [`GeoLocator`] for the requester's country and city
//! before recording a click. No lookup database ships with the service, so the
//! default [`NullGeoLocator`] knows nothing and clicks are stored without location.

use async_trait::async_trait;
use std::net::IpAddr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoLocation {
    pub country: Option<String>,
    pub city: Option<String>,
}

#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Returns `None` when the address cannot be located.
    async fn locate(&self, ip: IpAddr) -> Option<GeoLocation>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullGeoLocator;

#[async_trait]
impl GeoLocator for NullGeoLocator {
    async fn locate(&self, _ip: IpAddr) -> Option<GeoLocation> {
        None
    }
}
