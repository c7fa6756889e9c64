//! Domain layer containing business entities and contracts.
//!
//! This module is independent of infrastructure and presentation concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`identity`] - Bearer token issuing and verification contract
//! - [`click_event`] - Click accounting event model
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler resolves a short code to an active, unexpired link
//! 2. A [`click_event::ClickEvent`] is submitted to the click queue (non-blocking)
//! 3. [`crate::application::click_worker::run_click_worker`] consumes events
//! 4. [`repositories::LinkRepository::increment_clicks`] applies the atomic increment

pub mod click_event;
pub mod entities;
pub mod identity;
pub mod repositories;
