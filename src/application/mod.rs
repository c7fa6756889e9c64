//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation and lifecycle with ownership checks
//! - [`services::code_generator::CodeGenerator`] - Unique short code allocation
//! - [`services::redirect_service::RedirectService`] - Short code resolution
//! - [`services::click_service::ClickService`] - Atomic click accounting with retry
//! - [`services::account_service::AccountService`] - Registration, login, password reset
//!
//! The [`click_worker`] module connects redirects to click accounting through a
//! bounded queue.

pub mod click_worker;
pub mod services;
