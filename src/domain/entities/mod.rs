//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`User`] - A registered account
//! - [`Link`] - A shortened URL owned by a user
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with separate structs for creation:
//! - `NewUser`, `NewLink` - For creating new records
//! - `LinkPatch` - For partial updates

pub mod link;
pub mod user;

pub use link::{Link, LinkPatch, NewLink};
pub use user::{NewUser, User};
