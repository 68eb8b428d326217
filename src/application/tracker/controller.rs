use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tracing::debug;

use reybex_api_types::EntityId;

use crate::domain::booking::DurationSnapshot;

use super::{
    clock::{Clock, SystemClock},
    state::{DurationTracker, FetchTicket, SnapshotOutcome, TrackerStatus},
};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What the presentation layer needs to draw the timer.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackerView {
    pub status: TrackerStatus,
    pub display_ms: u64,
    pub active_task_id: Option<EntityId>,
}

impl TrackerView {
    fn of<C: Clock>(tracker: &DurationTracker<C>) -> Self {
        Self {
            status: tracker.status(),
            display_ms: tracker.display_ms(),
            active_task_id: tracker.active_task_id().cloned(),
        }
    }
}

/// Drives a [`DurationTracker`] from a tokio interval.
///
/// The controller is the only owner of the tick task. Every operation that
/// can start or cancel it holds the ticker lock first and the state lock
/// second; the tick task itself only takes the state lock.
#[derive(Clone)]
pub struct TrackerController<C: Clock = SystemClock> {
    state: Arc<Mutex<DurationTracker<C>>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
    view: Arc<watch::Sender<TrackerView>>,
}

impl TrackerController<SystemClock> {
    pub fn new(tick_interval: Duration) -> Self {
        Self::with_clock(SystemClock, tick_interval)
    }
}

impl Default for TrackerController<SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl<C: Clock> TrackerController<C> {
    pub fn with_clock(clock: C, tick_interval: Duration) -> Self {
        let (view, _) = watch::channel(TrackerView::default());
        Self {
            state: Arc::new(Mutex::new(DurationTracker::new(clock))),
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
            view: Arc::new(view),
        }
    }

    /// Receive a [`TrackerView`] every time the tracker changes.
    pub fn subscribe(&self) -> watch::Receiver<TrackerView> {
        self.view.subscribe()
    }

    pub async fn view(&self) -> TrackerView {
        TrackerView::of(&*self.state.lock().await)
    }

    pub async fn current_display_ms(&self) -> u64 {
        self.state.lock().await.display_ms()
    }

    pub async fn status(&self) -> TrackerStatus {
        self.state.lock().await.status()
    }

    /// Whether a tick task is currently alive.
    pub async fn is_ticking(&self) -> bool {
        self.ticker
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub async fn begin_fetch(&self) -> FetchTicket {
        self.state.lock().await.begin_fetch()
    }

    pub async fn apply_snapshot(
        &self,
        ticket: FetchTicket,
        snapshot: &DurationSnapshot,
    ) -> SnapshotOutcome {
        let mut ticker = self.ticker.lock().await;
        let outcome = {
            let mut state = self.state.lock().await;
            let outcome = state.apply_snapshot(ticket, snapshot);
            if outcome != SnapshotOutcome::Stale {
                self.publish(&state);
            }
            outcome
        };

        match outcome {
            SnapshotOutcome::Started => self.spawn_ticker(&mut ticker),
            SnapshotOutcome::Resynced => {
                if !ticker.as_ref().is_some_and(|handle| !handle.is_finished()) {
                    self.spawn_ticker(&mut ticker);
                }
            }
            SnapshotOutcome::Idle => cancel(&mut ticker),
            SnapshotOutcome::Stale => {
                debug!(
                    target = "reybex::tracker",
                    "Discarded snapshot fetched before the last stop"
                );
            }
        }
        outcome
    }

    /// Record a failed snapshot fetch; the tracker goes idle unless the
    /// ticket is stale.
    pub async fn fetch_failed(&self, ticket: FetchTicket) {
        let mut ticker = self.ticker.lock().await;
        let mut state = self.state.lock().await;
        if state.fetch_failed(ticket) {
            cancel(&mut ticker);
            self.publish(&state);
        }
    }

    /// Cancel ticking and return to idle. Fetches already in flight are
    /// invalidated.
    pub async fn stop(&self) {
        let mut ticker = self.ticker.lock().await;
        cancel(&mut ticker);
        let mut state = self.state.lock().await;
        state.stop();
        self.publish(&state);
    }

    fn publish(&self, state: &DurationTracker<C>) {
        self.view.send_replace(TrackerView::of(state));
    }

    fn spawn_ticker(&self, slot: &mut Option<JoinHandle<()>>) {
        cancel(slot);

        let state = Arc::clone(&self.state);
        let view = Arc::clone(&self.view);
        let period = self.tick_interval;

        *slot = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let mut tracker = state.lock().await;
                let running = tracker.tick().is_some();
                view.send_replace(TrackerView::of(&tracker));
                if !running {
                    break;
                }
            }
        }));
    }
}

fn cancel(slot: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = slot.take() {
        handle.abort();
    }
}
