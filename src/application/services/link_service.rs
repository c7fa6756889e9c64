//! Link lifecycle: creation, listing, retitling, soft deletion and stats.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::services::code_generator::{CodeGenerator, MAX_ATTEMPTS};
use crate::domain::entities::{DEFAULT_TITLE, Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::url_normalizer::validate_url;

/// Parameters for [`LinkService::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub original_url: String,
    pub custom_code: Option<String>,
    pub title: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub owner_id: Option<i64>,
}

/// Click statistics for one link.
#[derive(Debug, Clone)]
pub struct LinkStats {
    pub link: Link,
    pub total_clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
}

/// Service for creating and managing shortened links.
///
/// # Ownership
///
/// `update_title`, `delete` and `stats` take the caller's optional account id.
/// With an id, only that account's active links match. Without one the owner
/// filter is skipped entirely, so anonymous callers can manage any active link
/// by id. Listing is the exception: anonymous callers get an empty list.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    code_generator: CodeGenerator<L>,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self {
            code_generator: CodeGenerator::new(link_repository.clone()),
            link_repository,
        }
    }

    /// Creates a short link.
    ///
    /// The URL is stored exactly as submitted. A blank title becomes
    /// `"Untitled"`. An expiry in the past is accepted; such a link simply
    /// never resolves.
    ///
    /// # Code Allocation
    ///
    /// - Custom codes are format-checked and must be free, including codes of
    ///   deleted links
    /// - Generated codes are redrawn on a lookup collision or when an insert
    ///   loses a race on the unique constraint; both count against
    ///   [`MAX_ATTEMPTS`]
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the URL fails validation (nothing is persisted)
    /// - [`AppError::Validation`] if the custom code format is invalid
    /// - [`AppError::CodeTaken`] if the custom code is in use
    /// - [`AppError::Exhausted`] if no free code could be found
    pub async fn create(&self, request: CreateLink) -> Result<Link, AppError> {
        validate_url(&request.original_url).map_err(|e| AppError::InvalidUrl {
            reason: e.to_string(),
        })?;

        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_string();

        let new_link = |short_code: String| NewLink {
            short_code,
            original_url: request.original_url.clone(),
            title: title.clone(),
            owner_id: request.owner_id,
            expires_at: request.expires_at,
        };

        if let Some(custom) = request.custom_code.as_deref() {
            self.code_generator.validate_custom(custom).await?;
            return self.link_repository.create(new_link(custom.to_string())).await;
        }

        // Lookup collisions and lost insert races share one budget.
        let mut remaining = MAX_ATTEMPTS;
        loop {
            let code = self.code_generator.generate(&mut remaining).await?;

            match self.link_repository.create(new_link(code)).await {
                Err(AppError::CodeTaken { code }) => {
                    tracing::warn!(%code, remaining, "Short code taken by concurrent insert, retrying");
                }
                result => return result,
            }
        }
    }

    /// Lists the owner's active links, newest first.
    ///
    /// Anonymous callers get an empty list, never every link.
    pub async fn list_for_owner(&self, owner_id: Option<i64>) -> Result<Vec<Link>, AppError> {
        match owner_id {
            Some(owner_id) => self.link_repository.list_active_by_owner(owner_id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Replaces the title of an active link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFoundOrForbidden`] if no active link with that id
    /// matches the caller (see the type-level ownership notes).
    pub async fn update_title(
        &self,
        link_id: i64,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Link, AppError> {
        self.link_repository
            .update_title(link_id, title.trim(), owner_id)
            .await?
            .ok_or(AppError::NotFoundOrForbidden { link_id })
    }

    /// Soft-deletes an active link. Deleting twice fails the second time.
    pub async fn delete(&self, link_id: i64, owner_id: Option<i64>) -> Result<(), AppError> {
        if self.link_repository.soft_delete(link_id, owner_id).await? {
            tracing::info!(link_id, "Link deleted");
            Ok(())
        } else {
            Err(AppError::NotFoundOrForbidden { link_id })
        }
    }

    /// Returns click statistics for a link the caller may see.
    pub async fn stats(&self, link_id: i64, owner_id: Option<i64>) -> Result<LinkStats, AppError> {
        let link = self
            .link_repository
            .find_by_id(link_id)
            .await?
            .filter(|link| link.is_visible_to(owner_id))
            .ok_or(AppError::NotFoundOrForbidden { link_id })?;

        Ok(LinkStats {
            total_clicks: link.click_count,
            last_clicked: link.last_clicked_at,
            link,
        })
    }
}
