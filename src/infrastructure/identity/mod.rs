//! Identity provider implementations.

pub mod jwt;

pub use jwt::JwtIdentityProvider;
