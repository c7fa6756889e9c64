//! Background click accounting pipeline.
//!
//! Redirect handlers submit [`ClickEvent`]s to a [`ClickQueue`] without waiting;
//! [`run_click_worker`] applies them with bounded parallelism.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::application::services::ClickService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Sending half of the click queue.
///
/// Cloning is cheap; every clone feeds the same worker.
#[derive(Clone)]
pub struct ClickQueue {
    sender: mpsc::Sender<ClickEvent>,
}

impl ClickQueue {
    /// Creates a queue holding up to `capacity` pending events.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ClickEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Submits a click without blocking the caller.
    ///
    /// When the queue is full, a detached task waits for capacity so the click
    /// is still attempted exactly once. Only a closed queue (worker gone during
    /// shutdown) loses the event, and that is logged.
    pub fn submit(&self, event: ClickEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                metrics::counter!("click_queue_full_total").increment(1);
                tracing::debug!(link_id = event.link_id, "Click queue full, deferring submit");

                let sender = self.sender.clone();
                tokio::spawn(async move {
                    if let Err(mpsc::error::SendError(event)) = sender.send(event).await {
                        log_lost(&event);
                    }
                });
            }
            Err(mpsc::error::TrySendError::Closed(event)) => log_lost(&event),
        }
    }

    /// Free slots left in the queue.
    pub fn remaining_capacity(&self) -> usize {
        self.sender.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

fn log_lost(event: &ClickEvent) {
    metrics::counter!("clicks_failed_total").increment(1);
    tracing::error!(
        link_id = event.link_id,
        code = %event.short_code,
        "Click queue closed, click lost"
    );
}

/// Consumes click events until every sender is dropped.
///
/// At most `concurrency` increments run at once. In-flight work is drained
/// before returning, so awaiting this future on shutdown flushes the queue.
pub async fn run_click_worker<L>(
    mut receiver: mpsc::Receiver<ClickEvent>,
    click_service: Arc<ClickService<L>>,
    concurrency: usize,
) where
    L: LinkRepository + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    tracing::info!(concurrency, "Click worker started");

    while let Some(event) = receiver.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let service = click_service.clone();
        tasks.spawn(async move {
            let _permit = permit;
            service.record_click(&event).await;
        });

        // Reap finished tasks so the set does not grow with the queue.
        while let Some(result) = tasks.try_join_next() {
            if let Err(e) = result {
                tracing::error!(error = %e, "Click task panicked");
            }
        }
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            tracing::error!(error = %e, "Click task panicked");
        }
    }

    tracing::info!("Click worker stopped");
}
