//! Conflict detection for candidate booking intervals.
//!
//! Pure read path: flags every non-cancelled booking whose interval
//! overlaps the candidate under the half-open rule. Callers on the write
//! path abort creation/update when a conflict is reported; this service
//! never mutates state.

use chrono::{NaiveDate, NaiveTime};

use crate::api::{BookingId, ConflictReport, VenueId};
use crate::db::repository::BookingRepository;
use crate::error::EngineResult;
use crate::models::TimeInterval;

/// Check a candidate interval against existing bookings for a venue/date.
///
/// `exclude_booking_id` skips one booking, used when re-checking an
/// existing booking being edited. Touching endpoints do not conflict.
pub async fn check_conflicts(
    repo: &dyn BookingRepository,
    venue_id: VenueId,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    exclude_booking_id: Option<BookingId>,
) -> EngineResult<ConflictReport> {
    let candidate = TimeInterval::new(date, start, end)?;

    let bookings = repo.find_bookings_by_venue_and_date(venue_id, date).await?;
    let conflicting_bookings: Vec<_> = bookings
        .into_iter()
        .filter(|booking| {
            booking.is_blocking()
                && Some(booking.id) != exclude_booking_id
                && booking.interval().overlaps(&candidate)
        })
        .collect();

    Ok(ConflictReport {
        has_conflict: !conflicting_bookings.is_empty(),
        conflicting_bookings,
    })
}
