use reybex_api_types::{BookingTime, EntityId};

/// Point-in-time read of the server-tracked booking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationSnapshot {
    /// Elapsed milliseconds of the running booking; negative readings are dropped.
    pub elapsed_ms: Option<u64>,
    pub active_task_id: Option<EntityId>,
    pub is_active: bool,
}

impl DurationSnapshot {
    pub fn active(task_id: EntityId, elapsed_ms: u64) -> Self {
        Self {
            elapsed_ms: Some(elapsed_ms),
            active_task_id: Some(task_id),
            is_active: true,
        }
    }

    pub fn inactive() -> Self {
        Self::default()
    }

    /// Whether this snapshot reports `task_id` as the booked task.
    pub fn is_tracking(&self, task_id: &EntityId) -> bool {
        self.active_task_id.as_ref() == Some(task_id)
    }
}

impl From<&BookingTime> for DurationSnapshot {
    fn from(booking: &BookingTime) -> Self {
        let elapsed_ms = booking
            .booking_time
            .and_then(|value| u64::try_from(value).ok());
        let is_active = booking.show_current_booking.unwrap_or(false) && booking.id.is_some();

        Self {
            elapsed_ms,
            active_task_id: booking.id.clone(),
            is_active,
        }
    }
}
