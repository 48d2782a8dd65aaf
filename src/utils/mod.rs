//! Utility functions for key generation, URL processing, and password hashing.
//!
//! - [`key_generator`] - Short key generation
//! - [`url_normalizer`] - URL validation and normalization
//! - [`password`] - Argon2 hashing on the blocking pool
//! - [`counters`] - Metrics counters

pub mod counters;
pub mod key_generator;
pub mod password;
pub mod url_normalizer;
