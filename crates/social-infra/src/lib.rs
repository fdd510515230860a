//! # Social Infrastructure
//!
//! Concrete implementations of the ports defined in `social-core`:
//! password hashing, bearer tokens and the content/credential stores.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL store via SeaORM
//!
//! The in-memory store is always available.

pub mod auth;
pub mod memory;

#[cfg(feature = "postgres")]
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use memory::InMemoryDatabase;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, DatabaseConnections};
