//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access behind the Repository pattern and are
//! implemented by concrete repositories in the infrastructure layer.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link store: creation, lookup, click counters, lifecycle
//! - [`AccountRepository`] - Account storage
//!
//! # Testing
//!
//! Mock implementations are generated via `mockall` for unit tests.
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod account_repository;
pub mod link_repository;

pub use account_repository::AccountRepository;
pub use link_repository::{ClickWriteError, LinkRepository};

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
