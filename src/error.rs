//! Engine error taxonomy.
//!
//! Input-shape errors (`InvalidInterval`, `InvalidRange`) are raised
//! synchronously and never retried. `Storage` wraps any repository failure.
//! Refund failures are deliberately not represented here: a failed refund
//! does not roll back a cancellation and travels inside
//! [`crate::api::CancellationResult`] instead.

use crate::db::repository::RepositoryError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error type for the scheduling engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A time interval with `start >= end` was supplied.
    #[error("Invalid interval: {date} {start}..{end} (start must precede end)")]
    InvalidInterval {
        date: chrono::NaiveDate,
        start: chrono::NaiveTime,
        end: chrono::NaiveTime,
    },

    /// A date range with `from > to` was supplied.
    #[error("Invalid date range: {from}..{to} (from must not exceed to)")]
    InvalidRange {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },

    /// The referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// The booking is already cancelled; cancellation is terminal.
    #[error("Booking {0} is already cancelled")]
    AlreadyCancelled(i64),

    /// Completed bookings cannot be cancelled.
    #[error("Booking {id} cannot be cancelled from status {status}")]
    BookingNotCancellable { id: i64, status: &'static str },

    /// A status transition outside the booking state machine was requested.
    #[error("Booking {id}: cannot transition from {from} to {to}")]
    InvalidStatusTransition {
        id: i64,
        from: &'static str,
        to: &'static str,
    },

    /// The recurrence window would produce more instances than the cap allows.
    #[error("Recurrence range too large: {candidates} candidate instances (max {max})")]
    RecurrenceRangeTooLarge { candidates: usize, max: usize },

    /// The candidate interval overlaps at least one existing booking.
    /// A normal write-path outcome, not an internal failure.
    #[error("Booking conflicts with {} existing booking(s)", conflicting.len())]
    ConflictDetected {
        conflicting: Vec<crate::models::Booking>,
    },

    /// A storage collaborator failed.
    #[error("Storage failure: {0}")]
    Storage(#[from] RepositoryError),
}
