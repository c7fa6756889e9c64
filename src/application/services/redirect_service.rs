//! Short code resolution for the redirect path.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::is_code_alphabet;

/// Outcome of resolving a short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Active, unexpired link. `target` already carries a scheme.
    Resolved {
        link_id: i64,
        short_code: String,
        target: String,
    },
    /// Unknown code, malformed code, or soft-deleted link.
    NotFound,
    Expired,
}

/// Resolves short codes to redirect targets.
///
/// Every call reads the link store; there is no cache, so deletions and
/// expiry take effect on the next request.
pub struct RedirectService<L: LinkRepository> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository> RedirectService<L> {
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Resolves `code`.
    ///
    /// Codes outside the short code alphabet are `NotFound` without a lookup.
    /// A deleted link is `NotFound` even if it is also past its expiry.
    ///
    /// # Errors
    ///
    /// Only storage failures are errors; every lookup outcome is a [`Resolution`].
    pub async fn resolve(&self, code: &str) -> Result<Resolution, AppError> {
        if !is_code_alphabet(code) {
            return Ok(Resolution::NotFound);
        }

        let Some(link) = self.link_repository.find_by_code(code).await? else {
            return Ok(Resolution::NotFound);
        };

        if !link.is_active() {
            return Ok(Resolution::NotFound);
        }

        if link.is_expired_at(Utc::now()) {
            return Ok(Resolution::Expired);
        }

        Ok(Resolution::Resolved {
            target: link.redirect_target(),
            link_id: link.id,
            short_code: link.short_code,
        })
    }
}
