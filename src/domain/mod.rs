//! Domain layer containing business entities and logic.
//!
//! This module implements the core domain logic following Clean Architecture principles.
//! It defines entities, repository interfaces, and the three core components, all
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`slug_allocator`] - Unique short identifier allocation
//! - [`rate_limiter`] - Fixed-window request admission per client
//! - [`click_analytics`] - Click history summaries
//! - [`clock`] - Injectable time source
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Use cases are orchestrated in services (see [`crate::application::services`])

pub mod click_analytics;
pub mod clock;
pub mod entities;
pub mod rate_limiter;
pub mod repositories;
pub mod slug_allocator;
