//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use std::sync::LazyLock;
use validator::Validate;

use crate::application::services::LinkStats;
use crate::domain::entities::Link;

/// Characters allowed in custom codes (case-sensitive).
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid custom code regex"));

/// Matches any string with at least one non-whitespace character.
static NOT_BLANK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S").expect("valid not-blank regex"));

/// Request body for `POST /api/urls/shorten`.
///
/// An empty `custom_code` is treated as absent.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// Destination URL; a missing field fails validation rather than parsing.
    #[serde(default)]
    #[validate(length(min = 1, max = 2048, message = "original_url is required"))]
    pub original_url: String,

    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    #[validate(length(max = 50))]
    #[validate(regex(path = *CUSTOM_CODE_REGEX, message = "Only letters, digits, '-' and '_' are allowed"))]
    pub custom_code: Option<String>,

    #[validate(length(max = 255))]
    pub title: Option<String>,

    /// After this instant the short URL answers 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request body for `PUT /api/urls/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTitleRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    #[validate(regex(path = *NOT_BLANK_REGEX, message = "Title must not be blank"))]
    pub title: String,
}

/// A link as returned by the API.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
}

impl LinkResponse {
    /// Builds the response, joining `base_url` and the code into `short_url`.
    pub fn from_link(link: Link, base_url: &str) -> Self {
        let is_expired = link.is_expired();
        Self {
            short_url: format!("{}/{}", base_url.trim_end_matches('/'), link.short_code),
            id: link.id,
            short_code: link.short_code,
            original_url: link.original_url,
            title: link.title,
            created_at: link.created_at,
            expires_at: link.expires_at,
            click_count: link.click_count,
            last_clicked_at: link.last_clicked_at,
            is_expired,
        }
    }
}

/// Response for `GET /api/urls/list`.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}

/// Response for `GET /api/urls/{id}/stats`.
#[derive(Debug, Serialize)]
pub struct LinkStatsResponse {
    pub link: LinkResponse,
    pub total_clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
}

impl LinkStatsResponse {
    pub fn from_stats(stats: LinkStats, base_url: &str) -> Self {
        Self {
            total_clicks: stats.total_clicks,
            last_clicked: stats.last_clicked,
            link: LinkResponse::from_link(stats.link, base_url),
        }
    }
}

/// Response for `DELETE /api/urls/{id}`.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: i64,
    pub deleted: bool,
}
