//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A slug to destination mapping owned by a user
//! - [`Click`] - A single redirect event on a link
//! - [`User`] - The owner of links and API tokens
//!
//! Creation inputs live beside their entity (`NewLink`, `NewClick`, `NewUser`),
//! partial updates use [`LinkPatch`].

pub mod click;
pub mod link;
pub mod user;

pub use click::{Click, NewClick};
pub use link::{Link, LinkPatch, NewLink};
pub use user::{NewUser, User};
