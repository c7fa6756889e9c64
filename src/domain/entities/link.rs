//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// Title assigned to links created without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Lifecycle state of a link.
///
/// `Deleted` is terminal: no operation moves a link back to `Active`.
/// Expiry is not a stored state; it is computed from `expires_at` at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Active,
    Deleted,
}

impl LinkState {
    pub fn from_active_flag(is_active: bool) -> Self {
        if is_active { Self::Active } else { Self::Deleted }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A shortened URL with its ownership, expiry and click counters.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    /// Destination exactly as submitted; see [`Link::redirect_target`].
    pub original_url: String,
    pub title: String,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub state: LinkState,
}

impl Link {
    /// Returns true unless the link has been soft-deleted.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Returns true if `expires_at` lies strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Applies the ownership rule shared by update, delete and stats.
    ///
    /// With an owner, only that owner's active links match. Without one
    /// (anonymous caller) no owner filter is applied at all, so legacy
    /// ownerless links stay manageable. This mirrors the SQL filter
    /// `($owner IS NULL OR owner_id = $owner)` used by the repository.
    pub fn is_visible_to(&self, owner_id: Option<i64>) -> bool {
        self.is_active() && owner_id.is_none_or(|owner| self.owner_id == Some(owner))
    }

    /// URL the redirect points to; `https://` is assumed when no scheme was given.
    pub fn redirect_target(&self) -> String {
        crate::utils::url_normalizer::redirect_target(&self.original_url)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub short_code: String,
    pub original_url: String,
    pub title: String,
    pub owner_id: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}
