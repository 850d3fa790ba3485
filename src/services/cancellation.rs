//! Cancellation policy engine.
//!
//! State machine: `Pending|Confirmed -> Cancelled`, terminal. The refund
//! decision uses the configured cutoff (48 hours by default) against an
//! injected clock: at or above the cutoff the captured payment is refunded
//! in full; below it the payment is forfeited. The status transition is
//! committed before the refund call and is never rolled back; the renter's
//! slot must be released even when the refund instruction fails.

use chrono::{Duration, NaiveDateTime, TimeZone, Utc};
use tracing::{info, warn};

use crate::api::{BookingId, CancellationResult, RenterId};
use crate::config::EngineConfig;
use crate::db::repository::FullRepository;
use crate::error::{EngineError, EngineResult};
use crate::models::{BookingStatus, Clock, Payment};
use crate::services::payments::PaymentGateway;

/// Cancel a booking and decide the refund.
///
/// Fails with `NotFound`, `AlreadyCancelled` (cancellation is idempotent at
/// the status level: a retry cannot double-refund) or
/// `BookingNotCancellable` for completed bookings. A refund-gateway failure
/// is reported in `CancellationResult::refund_error`, not as an error.
pub async fn cancel_booking(
    repo: &dyn FullRepository,
    gateway: &dyn PaymentGateway,
    clock: &dyn Clock,
    config: &EngineConfig,
    booking_id: BookingId,
    requester_id: RenterId,
) -> EngineResult<CancellationResult> {
    let booking = repo
        .find_booking_by_id(booking_id)
        .await?
        .ok_or(EngineError::NotFound {
            entity: "booking",
            id: booking_id.value(),
        })?;

    match booking.status {
        BookingStatus::Pending | BookingStatus::Confirmed => {}
        BookingStatus::Cancelled => {
            return Err(EngineError::AlreadyCancelled(booking_id.value()))
        }
        BookingStatus::Completed => {
            return Err(EngineError::BookingNotCancellable {
                id: booking_id.value(),
                status: booking.status.as_str(),
            })
        }
    }

    let refundable = refundable_payment(repo, &booking, clock, config).await?;

    // Release the slot first. The refund is reconciled separately if the
    // gateway call below fails.
    repo.update_booking_status(booking_id, BookingStatus::Cancelled)
        .await?;
    info!(
        booking = booking_id.value(),
        requester = requester_id.value(),
        refund_owed = refundable.is_some(),
        "cancelled booking"
    );

    let Some(payment) = refundable else {
        return Ok(CancellationResult::no_refund());
    };

    match gateway.issue_refund(payment.id, payment.amount_cents).await {
        Ok(()) => {
            repo.mark_payment_refunded(payment.id).await?;
            Ok(CancellationResult {
                refund_issued: true,
                refund_amount_cents: Some(payment.amount_cents),
                refund_error: None,
            })
        }
        Err(err) => {
            warn!(
                booking = booking_id.value(),
                payment = payment.id.value(),
                error = %err,
                "refund failed after cancellation; needs reconciliation"
            );
            Ok(CancellationResult {
                refund_issued: false,
                refund_amount_cents: Some(payment.amount_cents),
                refund_error: Some(err.to_string()),
            })
        }
    }
}

/// The captured payment to refund, if the cutoff policy owes one.
async fn refundable_payment(
    repo: &dyn FullRepository,
    booking: &crate::models::Booking,
    clock: &dyn Clock,
    config: &EngineConfig,
) -> EngineResult<Option<Payment>> {
    let Some(payment_id) = booking.payment_id else {
        return Ok(None);
    };

    let start: NaiveDateTime = booking.date.and_time(booking.start_time);
    let start_instant = Utc.from_utc_datetime(&start);
    let until_start = start_instant.signed_duration_since(clock.now());
    if until_start < Duration::hours(config.cancellation_cutoff_hours) {
        return Ok(None);
    }

    let payment = repo.find_payment_by_id(payment_id).await?;
    Ok(payment.filter(Payment::is_refundable))
}
