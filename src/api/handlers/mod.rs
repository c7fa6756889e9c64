//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod links;
pub mod redirect;

pub use auth::{
    forgot_password_handler, login_handler, profile_handler, register_handler,
    reset_password_handler, verify_token_handler,
};
pub use health::health_handler;
pub use links::{
    delete_link_handler, link_stats_handler, list_links_handler, shorten_handler,
    update_link_handler,
};
pub use redirect::redirect_handler;
