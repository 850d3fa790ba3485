//! Recurring booking generation.
//!
//! Expands a parent booking's recurrence rule into child bookings, one per
//! step past the parent's date up to `recurring_end_date`. A step whose
//! interval conflicts with an existing booking is skipped, not an error: a
//! partial series is an accepted, recoverable outcome that the caller can
//! see in the returned report.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::api::RecurringOutcome;
use crate::config::EngineConfig;
use crate::db::repository::{FullRepository, NewBooking};
use crate::error::{EngineError, EngineResult};
use crate::models::{Booking, BookingStatus, RecurringType};
use crate::services::conflicts::check_conflicts;

/// Generate and persist the child bookings of a recurring parent.
///
/// Children copy the parent's venue, renter, time-of-day and price, carry
/// `parent_booking_id`, and start in `Pending` status. The candidate count
/// is capped by `max_recurring_instances` before anything is created.
pub async fn generate_recurring_bookings(
    repo: &dyn FullRepository,
    config: &EngineConfig,
    parent: &Booking,
) -> EngineResult<RecurringOutcome> {
    let Some(end_date) = parent.recurring_end_date else {
        return Ok(RecurringOutcome {
            created: vec![],
            skipped_dates: vec![],
        });
    };
    if parent.recurring_type == RecurringType::None {
        return Ok(RecurringOutcome {
            created: vec![],
            skipped_dates: vec![],
        });
    }

    let candidates = candidate_dates(
        parent.recurring_type,
        parent.date,
        end_date,
        config.max_recurring_instances,
    );
    if candidates.len() > config.max_recurring_instances {
        return Err(EngineError::RecurrenceRangeTooLarge {
            candidates: candidates.len(),
            max: config.max_recurring_instances,
        });
    }

    let mut created = Vec::new();
    let mut skipped_dates = Vec::new();

    for date in candidates {
        let report = check_conflicts(
            repo,
            parent.venue_id,
            date,
            parent.start_time,
            parent.end_time,
            None,
        )
        .await?;
        if report.has_conflict {
            skipped_dates.push(date);
            continue;
        }

        let insert = repo
            .insert_booking(NewBooking {
                venue_id: parent.venue_id,
                renter_id: parent.renter_id,
                date,
                start_time: parent.start_time,
                end_time: parent.end_time,
                status: BookingStatus::Pending,
                recurring_type: RecurringType::None,
                recurring_end_date: None,
                parent_booking_id: Some(parent.id),
                payment_id: None,
                price_cents: parent.price_cents,
            })
            .await;

        match insert {
            Ok(child) => created.push(child),
            Err(err) if err.is_constraint_violation() => {
                // Lost the slot between check and insert; same as a
                // pre-flight conflict.
                warn!(parent = parent.id.value(), date = %date, "recurring step lost insert race, skipping");
                skipped_dates.push(date);
            }
            Err(err) => return Err(EngineError::Storage(err)),
        }
    }

    info!(
        parent = parent.id.value(),
        created = created.len(),
        skipped = skipped_dates.len(),
        "generated recurring series"
    );
    Ok(RecurringOutcome {
        created,
        skipped_dates,
    })
}

/// The dates one step or more past `start`, up to and including `end_date`.
///
/// Stops enumerating one date past `cap`, so a runaway end date is detected
/// without walking the whole range; the caller rejects any result longer
/// than `cap`.
fn candidate_dates(
    recurring_type: RecurringType,
    start: NaiveDate,
    end_date: NaiveDate,
    cap: usize,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while let Some(next) = recurring_type.next_date(current) {
        if next > end_date || dates.len() > cap {
            break;
        }
        dates.push(next);
        current = next;
    }
    dates
}
