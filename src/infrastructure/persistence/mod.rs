//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with bound
//! parameters throughout.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link store and atomic click counters
//! - [`PgAccountRepository`] - Account storage

pub mod pg_account_repository;
pub mod pg_link_repository;

pub use pg_account_repository::PgAccountRepository;
pub use pg_link_repository::PgLinkRepository;
