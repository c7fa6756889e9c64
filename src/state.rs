//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::click_worker::ClickQueue;
use crate::application::services::{AccountService, LinkService, RedirectService};
use crate::infrastructure::identity::JwtIdentityProvider;
use crate::infrastructure::persistence::{PgAccountRepository, PgLinkRepository};

pub type AppLinkService = LinkService<PgLinkRepository>;
pub type AppRedirectService = RedirectService<PgLinkRepository>;
pub type AppAccountService = AccountService<PgAccountRepository, JwtIdentityProvider>;

/// Request-independent settings used by handlers.
#[derive(Debug, Clone, Default)]
pub struct PublicSettings {
    /// Fixed public origin for short URLs; derived per request when unset.
    pub base_url: Option<String>,
    /// Trust `X-Forwarded-Proto` when deriving the origin.
    pub behind_proxy: bool,
    /// Return password reset tokens in the API response.
    pub expose_reset_tokens: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<PgPool>,
    pub link_service: Arc<AppLinkService>,
    pub redirect_service: Arc<AppRedirectService>,
    pub account_service: Arc<AppAccountService>,
    pub click_queue: ClickQueue,
    pub settings: Arc<PublicSettings>,
}

impl AppState {
    /// Wires repositories and services over a single connection pool.
    pub fn new(
        pool: Arc<PgPool>,
        identity: JwtIdentityProvider,
        fingerprint_secret: String,
        click_queue: ClickQueue,
        settings: PublicSettings,
    ) -> Self {
        let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
        let account_repository = Arc::new(PgAccountRepository::new(pool.clone()));

        Self {
            link_service: Arc::new(LinkService::new(link_repository.clone())),
            redirect_service: Arc::new(RedirectService::new(link_repository)),
            account_service: Arc::new(AccountService::new(
                account_repository,
                Arc::new(identity),
                fingerprint_secret,
            )),
            click_queue,
            settings: Arc::new(settings),
            pool,
        }
    }
}
