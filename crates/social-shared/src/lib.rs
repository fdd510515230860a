//! # Social Shared
//!
//! Wire types shared between the server and its clients.

pub mod dto;
pub mod response;

pub use response::{DetailResponse, ErrorResponse, MessageResponse};
