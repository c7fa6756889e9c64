//! Click accounting: durable, atomic counter updates with retry.
//!
//! Only failures known not to have committed are retried, so a click is
//! never counted twice.

use std::sync::Arc;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{ClickWriteError, LinkRepository};

/// Retries after the first failed increment, for retryable failures only.
const MAX_RETRIES: usize = 3;

/// Base delay of the exponential backoff, in milliseconds.
const BACKOFF_BASE_MS: u64 = 10;

const MAX_BACKOFF: Duration = Duration::from_millis(500);

/// Applies click events to the link store.
///
/// Failures never reach the redirect path: after the last retry the error is
/// logged and counted in `clicks_failed_total`.
pub struct ClickService<L: LinkRepository> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository> ClickService<L> {
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Records one click. Returns whether the increment was persisted.
    pub async fn record_click(&self, event: &ClickEvent) -> bool {
        let strategy = ExponentialBackoff::from_millis(BACKOFF_BASE_MS)
            .max_delay(MAX_BACKOFF)
            .map(jitter)
            .take(MAX_RETRIES);

        let result = RetryIf::spawn(
            strategy,
            || async move {
                self.link_repository
                    .increment_clicks(event.link_id, event.clicked_at)
                    .await
                    .inspect_err(|e| {
                        tracing::debug!(link_id = event.link_id, error = %e, "Click increment attempt failed");
                    })
            },
            ClickWriteError::is_retryable,
        )
        .await;

        match result {
            Ok(true) => {
                metrics::counter!("clicks_recorded_total").increment(1);
                true
            }
            Ok(false) => {
                // Links are never physically deleted, so this only happens if the
                // row vanished outside the application.
                tracing::warn!(
                    link_id = event.link_id,
                    code = %event.short_code,
                    "Click for unknown link dropped"
                );
                metrics::counter!("clicks_failed_total").increment(1);
                false
            }
            Err(e) => {
                log_failure(event, &e);
                metrics::counter!("clicks_failed_total").increment(1);
                false
            }
        }
    }
}

fn log_failure(event: &ClickEvent, error: &ClickWriteError) {
    tracing::error!(
        link_id = event.link_id,
        code = %event.short_code,
        error = %error,
        retryable = error.is_retryable(),
        "Failed to record click"
    );
}
