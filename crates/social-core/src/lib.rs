//! # Social Core
//!
//! The domain layer of the social backend.
//! Entities, error types and the ports that infrastructure implements.
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::RepoError;
