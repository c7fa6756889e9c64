//! Server-rendered HTML for the public redirect route.
//!
//! - [`pages`] - Error pages for unknown, expired and failed redirects

pub mod pages;
