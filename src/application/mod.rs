//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and the domain components.
//! HTTP handlers and the admin CLI talk only to this layer.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link lifecycle and slug resolution
//! - [`services::stats_service::StatsService`] - Click recording and summaries
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
