use serde::Serialize;
use time::{Duration, OffsetDateTime};

use reybex_api_types::EntityId;

use crate::domain::booking::DurationSnapshot;

use super::clock::Clock;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TrackerStatus {
    #[default]
    Idle,
    Running,
}

/// Permission to apply the result of one snapshot fetch. Tickets issued
/// before the most recent `stop` are stale and their results are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// What applying a snapshot did to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// The ticket predates a stop; nothing changed.
    Stale,
    /// The snapshot reported no active booking; the tracker is idle.
    Idle,
    /// The tracker went from idle to running.
    Started,
    /// Already running; only the anchor moved.
    Resynced,
}

/// Elapsed-time state machine reconciling server snapshots with the local
/// wall clock.
///
/// The anchor is the wall-clock instant the current booking started, derived
/// from the server's elapsed value. Between snapshots the display is
/// `now - anchor`, never decreasing while running.
#[derive(Debug)]
pub struct DurationTracker<C: Clock> {
    clock: C,
    anchor: Option<OffsetDateTime>,
    display_ms: u64,
    status: TrackerStatus,
    active_task_id: Option<EntityId>,
    generation: u64,
}

impl<C: Clock> DurationTracker<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            anchor: None,
            display_ms: 0,
            status: TrackerStatus::Idle,
            active_task_id: None,
            generation: 0,
        }
    }

    pub fn status(&self) -> TrackerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == TrackerStatus::Running
    }

    pub fn display_ms(&self) -> u64 {
        self.display_ms
    }

    pub fn active_task_id(&self) -> Option<&EntityId> {
        self.active_task_id.as_ref()
    }

    pub fn anchor(&self) -> Option<OffsetDateTime> {
        self.anchor
    }

    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
        }
    }

    fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    pub fn apply_snapshot(
        &mut self,
        ticket: FetchTicket,
        snapshot: &DurationSnapshot,
    ) -> SnapshotOutcome {
        if !self.is_current(ticket) {
            return SnapshotOutcome::Stale;
        }

        let elapsed_ms = match snapshot.elapsed_ms {
            Some(elapsed) if snapshot.is_active && elapsed > 0 => elapsed,
            _ => {
                self.reset();
                return SnapshotOutcome::Idle;
            }
        };

        let now = self.clock.now();
        let offset = Duration::milliseconds(i64::try_from(elapsed_ms).unwrap_or(i64::MAX));
        self.anchor = Some(now.checked_sub(offset).unwrap_or(now));
        self.display_ms = elapsed_ms;
        self.active_task_id = snapshot.active_task_id.clone();

        match self.status {
            TrackerStatus::Running => SnapshotOutcome::Resynced,
            TrackerStatus::Idle => {
                self.status = TrackerStatus::Running;
                SnapshotOutcome::Started
            }
        }
    }

    /// A fetch failed. A current ticket drops the tracker to idle; returns
    /// whether it did.
    pub fn fetch_failed(&mut self, ticket: FetchTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.reset();
        true
    }

    /// Advance the display from the wall clock. Returns the new display
    /// value, or `None` once the tracker is idle and ticking should end.
    pub fn tick(&mut self) -> Option<u64> {
        if self.status != TrackerStatus::Running {
            return None;
        }
        let Some(anchor) = self.anchor else {
            self.reset();
            return None;
        };

        let since_anchor = (self.clock.now() - anchor).whole_milliseconds().max(0);
        let since_anchor = u64::try_from(since_anchor).unwrap_or(u64::MAX);
        self.display_ms = self.display_ms.max(since_anchor);
        Some(self.display_ms)
    }

    /// Return to idle and invalidate every outstanding fetch ticket.
    pub fn stop(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.reset();
    }

    fn reset(&mut self) {
        self.anchor = None;
        self.display_ms = 0;
        self.status = TrackerStatus::Idle;
        self.active_task_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tracker::clock::ManualClock;

    fn tracker() -> (DurationTracker<ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        (DurationTracker::new(clock.clone()), clock)
    }

    fn active(ms: u64) -> DurationSnapshot {
        DurationSnapshot::active(EntityId::from("42"), ms)
    }

    #[test]
    fn active_snapshot_starts_running_with_server_elapsed() {
        let (mut tracker, _clock) = tracker();
        let ticket = tracker.begin_fetch();

        assert_eq!(
            tracker.apply_snapshot(ticket, &active(90_000)),
            SnapshotOutcome::Started
        );
        assert!(tracker.is_running());
        assert_eq!(tracker.display_ms(), 90_000);
        assert_eq!(tracker.active_task_id(), Some(&EntityId::from("42")));
    }

    #[test]
    fn reconciles_to_server_value_and_keeps_ticking_from_it() {
        let (mut tracker, clock) = tracker();
        tracker.apply_snapshot(tracker.begin_fetch(), &active(10_000));
        clock.advance(Duration::seconds(5));
        assert_eq!(tracker.tick(), Some(15_000));

        let outcome = tracker.apply_snapshot(tracker.begin_fetch(), &active(60_000));
        assert_eq!(outcome, SnapshotOutcome::Resynced);
        assert_eq!(tracker.display_ms(), 60_000);

        clock.advance(Duration::seconds(1));
        assert_eq!(tracker.tick(), Some(61_000));
    }

    #[test]
    fn ticks_never_decrease_within_an_episode() {
        let (mut tracker, clock) = tracker();
        tracker.apply_snapshot(tracker.begin_fetch(), &active(5_000));
        clock.advance(Duration::seconds(3));
        assert_eq!(tracker.tick(), Some(8_000));

        clock.advance(Duration::seconds(-10));
        assert_eq!(tracker.tick(), Some(8_000));

        clock.advance(Duration::seconds(12));
        assert_eq!(tracker.tick(), Some(10_000));
    }

    #[test]
    fn inactive_or_empty_snapshots_reset_to_idle() {
        for snapshot in [
            DurationSnapshot::inactive(),
            active(0),
            DurationSnapshot {
                elapsed_ms: None,
                active_task_id: Some(EntityId::from("1")),
                is_active: true,
            },
            DurationSnapshot {
                elapsed_ms: Some(5_000),
                active_task_id: None,
                is_active: false,
            },
        ] {
            let (mut tracker, _clock) = tracker();
            tracker.apply_snapshot(tracker.begin_fetch(), &active(1_000));
            let outcome = tracker.apply_snapshot(tracker.begin_fetch(), &snapshot);
            assert_eq!(outcome, SnapshotOutcome::Idle);
            assert_eq!(tracker.status(), TrackerStatus::Idle);
            assert_eq!(tracker.display_ms(), 0);
            assert_eq!(tracker.anchor(), None);
        }
    }

    #[test]
    fn stop_resets_everything() {
        let (mut tracker, clock) = tracker();
        tracker.apply_snapshot(tracker.begin_fetch(), &active(1_000));
        clock.advance(Duration::seconds(2));
        tracker.tick();

        tracker.stop();
        assert_eq!(tracker.status(), TrackerStatus::Idle);
        assert_eq!(tracker.display_ms(), 0);
        assert_eq!(tracker.anchor(), None);
        assert_eq!(tracker.active_task_id(), None);
        assert_eq!(tracker.tick(), None);
    }

    #[test]
    fn fetch_started_before_stop_cannot_resurrect_running() {
        let (mut tracker, _clock) = tracker();
        let ticket = tracker.begin_fetch();
        tracker.stop();

        assert_eq!(
            tracker.apply_snapshot(ticket, &active(30_000)),
            SnapshotOutcome::Stale
        );
        assert_eq!(tracker.status(), TrackerStatus::Idle);
        assert_eq!(tracker.display_ms(), 0);
    }

    #[test]
    fn failed_fetch_goes_idle_unless_stale() {
        let (mut tracker, _clock) = tracker();
        tracker.apply_snapshot(tracker.begin_fetch(), &active(1_000));
        let stale = tracker.begin_fetch();
        tracker.stop();
        tracker.apply_snapshot(tracker.begin_fetch(), &active(2_000));

        assert!(!tracker.fetch_failed(stale));
        assert!(tracker.is_running());

        assert!(tracker.fetch_failed(tracker.begin_fetch()));
        assert_eq!(tracker.status(), TrackerStatus::Idle);
    }

    #[test]
    fn tick_while_idle_is_a_no_op() {
        let (mut tracker, clock) = tracker();
        clock.advance(Duration::seconds(30));
        assert_eq!(tracker.tick(), None);
        assert_eq!(tracker.display_ms(), 0);
    }
}
