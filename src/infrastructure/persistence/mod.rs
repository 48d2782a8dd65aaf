//! SQLite repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries, plus pool setup and embedded migrations.
//!
//! # Repositories
//!
//! - [`SqliteUserRepository`] - User accounts
//! - [`SqliteLinkRepository`] - Link storage and click accounting

pub mod pool;
pub mod sqlite_link_repository;
pub mod sqlite_user_repository;

pub use pool::{PoolSettings, connect, run_migrations};
pub use sqlite_link_repository::SqliteLinkRepository;
pub use sqlite_user_repository::SqliteUserRepository;
