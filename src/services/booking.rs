//! Booking write path: creation and confirmation.
//!
//! Creation is check-then-act: a pre-flight conflict check rejects the
//! obvious overlaps, and the storage layer's atomic re-check inside
//! `insert_booking` decides the race two concurrent creations would
//! otherwise win together. Both rejections surface as `ConflictDetected`.

use tracing::info;

use crate::api::{BookingId, NewBookingRequest};
use crate::db::repository::{FullRepository, NewBooking};
use crate::error::{EngineError, EngineResult};
use crate::models::{Booking, BookingStatus, RecurringType, TimeInterval};
use crate::services::conflicts::check_conflicts;

/// Create a booking, rejecting conflicting intervals.
///
/// The new booking starts in `Pending` status. Recurring children are not
/// generated here; see [`crate::services::recurring`].
pub async fn create_booking(
    repo: &dyn FullRepository,
    request: NewBookingRequest,
) -> EngineResult<Booking> {
    TimeInterval::new(request.date, request.start_time, request.end_time)?;

    repo.find_venue_by_id(request.venue_id)
        .await?
        .ok_or(EngineError::NotFound {
            entity: "venue",
            id: request.venue_id.value(),
        })?;

    let report = check_conflicts(
        repo,
        request.venue_id,
        request.date,
        request.start_time,
        request.end_time,
        None,
    )
    .await?;
    if report.has_conflict {
        return Err(EngineError::ConflictDetected {
            conflicting: report.conflicting_bookings,
        });
    }

    let inserted = repo
        .insert_booking(NewBooking {
            venue_id: request.venue_id,
            renter_id: request.renter_id,
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            status: BookingStatus::Pending,
            recurring_type: request.recurring_type.unwrap_or(RecurringType::None),
            recurring_end_date: request.recurring_end_date,
            parent_booking_id: None,
            payment_id: None,
            price_cents: request.price_cents,
        })
        .await
        .map_err(|err| {
            if err.is_constraint_violation() {
                // A concurrent writer took the slot between the pre-flight
                // check and the insert.
                EngineError::ConflictDetected { conflicting: vec![] }
            } else {
                EngineError::Storage(err)
            }
        })?;

    info!(
        booking = inserted.id.value(),
        venue = inserted.venue_id.value(),
        date = %inserted.date,
        "created booking"
    );
    Ok(inserted)
}

/// Confirm a pending booking.
pub async fn confirm_booking(
    repo: &dyn FullRepository,
    booking_id: BookingId,
) -> EngineResult<Booking> {
    let booking = repo
        .find_booking_by_id(booking_id)
        .await?
        .ok_or(EngineError::NotFound {
            entity: "booking",
            id: booking_id.value(),
        })?;

    match booking.status {
        BookingStatus::Pending => {}
        BookingStatus::Cancelled => {
            return Err(EngineError::AlreadyCancelled(booking_id.value()))
        }
        other => {
            return Err(EngineError::InvalidStatusTransition {
                id: booking_id.value(),
                from: other.as_str(),
                to: BookingStatus::Confirmed.as_str(),
            })
        }
    }

    let updated = repo
        .update_booking_status(booking_id, BookingStatus::Confirmed)
        .await?;
    info!(booking = booking_id.value(), "confirmed booking");
    Ok(updated)
}
