//! Unique short code allocation against the link store.

use std::sync::Arc;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_code};

/// Total draws allowed for one link creation, counting both lookup
/// collisions and lost insert races.
pub const MAX_ATTEMPTS: usize = 10;

/// Produces short codes that are free in the link store.
///
/// Lookups include soft-deleted rows, so a deleted link's code is never reissued.
/// The check is advisory: the unique constraint on insert remains the final
/// arbiter and [`LinkRepository::create`] reports races as [`AppError::CodeTaken`].
pub struct CodeGenerator<L: LinkRepository> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository> CodeGenerator<L> {
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Returns a random 8-character code not currently held by any link.
    ///
    /// Each draw consumes one unit of `remaining`. Callers that also retry lost
    /// insert races pass the same budget, so lookups and races share
    /// [`MAX_ATTEMPTS`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Exhausted`] once `remaining` reaches zero.
    pub async fn generate(&self, remaining: &mut usize) -> Result<String, AppError> {
        while *remaining > 0 {
            *remaining -= 1;
            let code = generate_code()?;

            if self.link_repository.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }

            tracing::debug!(remaining = *remaining, "Generated short code collided, retrying");
        }

        metrics::counter!("code_generation_exhausted_total").increment(1);
        Err(AppError::Exhausted {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Checks a caller-supplied code for format and availability.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for format violations and
    /// [`AppError::CodeTaken`] if any link, active or deleted, holds the code.
    pub async fn validate_custom(&self, code: &str) -> Result<(), AppError> {
        validate_custom_code(code)?;

        if self.link_repository.find_by_code(code).await?.is_some() {
            return Err(AppError::CodeTaken {
                code: code.to_string(),
            });
        }

        Ok(())
    }
}
