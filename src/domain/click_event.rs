//! Click event model for asynchronous click accounting.

use chrono::{DateTime, Utc};

/// One successful resolution waiting to be counted.
///
/// Created by the redirect handler and passed to the background worker through
/// [`crate::application::click_worker::ClickQueue`], so that counter updates
/// never delay the redirect response.
///
/// `clicked_at` is captured at resolution time, not at persistence time.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub link_id: i64,
    pub short_code: String,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    pub fn new(link_id: i64, short_code: impl Into<String>) -> Self {
        Self {
            link_id,
            short_code: short_code.into(),
            clicked_at: Utc::now(),
        }
    }
}
