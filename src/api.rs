//! Public API surface for the scheduling engine.
//!
//! This file consolidates the identifier newtypes and the plain-data
//! request/result types the service layer produces. The HTTP layer (out of
//! scope here) is responsible for status-code mapping and envelope shape;
//! everything below is transport-agnostic and serde-serializable.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub use crate::models::{
    AvailabilityBlock, BlockSource, Booking, BookingStatus, Payment, PaymentStatus,
    RecurringTemplate, RecurringType, ScheduleMode, SyncQueueEntry, SyncStatus, TimeInterval,
    Venue,
};

/// Venue identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VenueId(pub i64);

/// Booking identifier.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BookingId(pub i64);

/// Renter (user) identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenterId(pub i64);

/// Recurring template identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub i64);

/// Payment identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(pub i64);

/// Sync queue entry identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueEntryId(pub i64);

macro_rules! impl_id {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                pub fn new(value: i64) -> Self {
                    $name(value)
                }

                pub fn value(&self) -> i64 {
                    self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<$name> for i64 {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )*
    };
}

impl_id!(VenueId, BookingId, RenterId, TemplateId, PaymentId, QueueEntryId);

/// A gap in the booked schedule, derived per query and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
}

impl ComputedSlot {
    /// The interval this slot covers.
    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            date: self.date,
            start: self.start_time,
            end: self.end_time,
        }
    }
}

impl From<TimeInterval> for ComputedSlot {
    fn from(interval: TimeInterval) -> Self {
        Self {
            date: interval.date,
            start_time: interval.start,
            end_time: interval.end,
            is_available: true,
        }
    }
}

/// Outcome of a conflict check against existing bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub has_conflict: bool,
    pub conflicting_bookings: Vec<Booking>,
}

/// Write-path request to create a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBookingRequest {
    pub venue_id: VenueId,
    pub renter_id: RenterId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub recurring_type: Option<RecurringType>,
    #[serde(default)]
    pub recurring_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub price_cents: Option<i64>,
}

/// Outcome of generating a recurring series from a parent booking.
///
/// Conflicting steps are skipped rather than failing the operation; a
/// partial series is an accepted, recoverable result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringOutcome {
    pub created: Vec<Booking>,
    pub skipped_dates: Vec<NaiveDate>,
}

/// Refund decision for a cancellation.
///
/// `refund_error` carries a non-fatal gateway failure: the booking is still
/// cancelled and the refund is reconciled separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationResult {
    pub refund_issued: bool,
    pub refund_amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_error: Option<String>,
}

impl CancellationResult {
    /// No payment existed or the cutoff was missed.
    pub fn no_refund() -> Self {
        Self {
            refund_issued: false,
            refund_amount_cents: None,
            refund_error: None,
        }
    }
}

/// Per-venue result of one sync-queue batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueSyncReport {
    pub venue_id: VenueId,
    pub refreshed_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = VenueId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_computed_slot_from_interval() {
        let interval = TimeInterval::new(
            "2026-03-02".parse().unwrap(),
            "09:00".parse().unwrap(),
            "10:00".parse().unwrap(),
        )
        .unwrap();

        let slot = ComputedSlot::from(interval);
        assert!(slot.is_available);
        assert_eq!(slot.interval(), interval);
    }

    #[test]
    fn test_cancellation_result_serializes_without_null_error() {
        let json = serde_json::to_value(CancellationResult::no_refund()).unwrap();
        assert_eq!(json["refund_issued"], false);
        assert!(json.get("refund_error").is_none());
    }
}
