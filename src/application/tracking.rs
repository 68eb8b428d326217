//! Booking actions that keep the live duration tracker in step with the
//! backend.

use tracing::warn;

use reybex_api_types::EntityId;

use crate::{
    application::{
        error::AppError,
        tracker::{Clock, SnapshotOutcome, SystemClock, TrackerController, TrackerView},
    },
    domain::booking::DurationSnapshot,
    infra::http::ReybexClient,
};

#[derive(Clone)]
pub struct TrackingService<C: Clock = SystemClock> {
    client: ReybexClient,
    tracker: TrackerController<C>,
}

impl<C: Clock> TrackingService<C> {
    pub fn new(client: ReybexClient, tracker: TrackerController<C>) -> Self {
        Self { client, tracker }
    }

    pub fn tracker(&self) -> &TrackerController<C> {
        &self.tracker
    }

    /// Fetch the current booking and reconcile the tracker with it.
    ///
    /// A failed fetch leaves the tracker idle and is returned to the caller;
    /// it never leaves a stale `Running` state behind.
    pub async fn refresh(&self) -> Result<TrackerView, AppError> {
        let ticket = self.tracker.begin_fetch().await;
        match self.client.booking_time().await {
            Ok(booking) => {
                let snapshot = DurationSnapshot::from(&booking);
                if self.tracker.apply_snapshot(ticket, &snapshot).await == SnapshotOutcome::Stale {
                    warn!(
                        target = "reybex::tracking",
                        "Booking snapshot arrived after tracking stopped"
                    );
                }
                Ok(self.tracker.view().await)
            }
            Err(err) => {
                warn!(
                    target = "reybex::tracking",
                    error = %err,
                    "Failed to fetch booking time"
                );
                self.tracker.fetch_failed(ticket).await;
                Err(err.into())
            }
        }
    }

    pub async fn start(&self, task_id: &EntityId) -> Result<TrackerView, AppError> {
        self.client.book_task(task_id).await?;
        self.refresh().await
    }

    pub async fn stop(&self) -> Result<TrackerView, AppError> {
        self.client.end_task().await?;
        self.tracker.stop().await;
        Ok(self.tracker.view().await)
    }
}
