//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL mapping with click counters
//! - [`Account`] - A user that can own links
//!
//! Entities follow the "New Type" pattern with separate structs for creation
//! (`NewLink`, `NewAccount`).

pub mod account;
pub mod link;

pub use account::{Account, DEFAULT_ACCOUNT_NAME, NewAccount};
pub use link::{DEFAULT_TITLE, Link, LinkState, NewLink};
