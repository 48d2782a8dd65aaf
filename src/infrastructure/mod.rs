//! Infrastructure layer: storage and the URL safety client.
//!
//! - [`persistence`] - SQLite repositories, pool setup, migrations
//! - [`safety`] - Safe Browsing lookup and the disabled fallback

pub mod persistence;
pub mod safety;
