//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`identity`] - Bearer token issuing and verification (JWT)

pub mod identity;
pub mod persistence;
