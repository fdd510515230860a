//! In-memory repositories - used when no database is configured, and in tests.
//!
//! All four repositories share one [`InMemoryDatabase`] so that uniqueness and
//! cascade rules span tables the same way the relational schema does.
//! Data is lost on process restart.

mod repositories;

pub use repositories::{
    InMemoryCommentRepository, InMemoryDatabase, InMemoryLikeRepository, InMemoryPostRepository,
    InMemoryUserRepository,
};
