//! Business logic services for the application layer.

pub mod account_service;
pub mod click_service;
pub mod code_generator;
pub mod link_service;
pub mod redirect_service;

pub use account_service::{AccountService, AuthSession};
pub use click_service::ClickService;
pub use code_generator::CodeGenerator;
pub use link_service::{CreateLink, LinkService, LinkStats};
pub use redirect_service::{RedirectService, Resolution};
