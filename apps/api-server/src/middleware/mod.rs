//! Middleware modules: error mapping and the authorization gate.

pub mod auth;
pub mod error;
