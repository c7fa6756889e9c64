//! Utility functions for code generation, URL processing, and request handling.
//!
//! - [`code_generator`] - Short code generation and format validation
//! - [`url_normalizer`] - Destination URL validation and redirect targets
//! - [`password`] - Argon2id hashing and password policy
//! - [`request_origin`] - Public origin extraction from HTTP headers
//! - [`db_error`] - PostgreSQL error classification

pub mod code_generator;
pub mod db_error;
pub mod password;
pub mod request_origin;
pub mod url_normalizer;
