//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Every API response is wrapped in
//! [`envelope::ApiResponse`].

pub mod auth;
pub mod envelope;
pub mod health;
pub mod link;
