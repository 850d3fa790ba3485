//! Availability resolution: the read path that turns base schedule plus
//! bookings into bookable slots.
//!
//! Base availability comes from exactly one source per venue (legacy rows
//! or materialized template rows, per the venue's schedule mode); both feed
//! the same subtraction algorithm, so the overlap logic stays single-path
//! and source-agnostic.

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::api::{ComputedSlot, VenueId};
use crate::db::repository::FullRepository;
use crate::error::{EngineError, EngineResult};
use crate::models::TimeInterval;

/// Compute the bookable slots for a venue in `[date_from, date_to]`,
/// ordered by (date, start time).
///
/// Overlapping or touching base blocks on the same date coalesce into one
/// span, then every span is reduced by every non-cancelled booking on its
/// date; a partially overlapped span splits into one or two fragments, a
/// fully consumed span yields nothing. The result never overlaps a
/// non-cancelled booking, and no two slots overlap each other.
pub async fn get_available_slots(
    repo: &dyn FullRepository,
    venue_id: VenueId,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> EngineResult<Vec<ComputedSlot>> {
    if date_from > date_to {
        return Err(EngineError::InvalidRange {
            from: date_from,
            to: date_to,
        });
    }

    let venue = repo
        .find_venue_by_id(venue_id)
        .await?
        .ok_or(EngineError::NotFound {
            entity: "venue",
            id: venue_id.value(),
        })?;

    let source = venue.schedule_mode.block_source();
    let blocks = repo
        .find_availability_blocks(venue_id, date_from, date_to, source)
        .await?;
    let bookings = repo
        .find_bookings_by_venue_and_date_range(venue_id, date_from, date_to)
        .await?;

    let booked: Vec<TimeInterval> = bookings
        .iter()
        .filter(|b| b.is_blocking())
        .map(|b| b.interval())
        .collect();

    // Coalesce overlapping/touching blocks per date so the same time range
    // is never emitted twice.
    let mut bases: Vec<TimeInterval> = blocks
        .iter()
        .filter(|b| b.is_available)
        .map(|b| b.interval())
        .collect();
    bases.sort_unstable();
    let mut merged: Vec<TimeInterval> = Vec::with_capacity(bases.len());
    for base in bases {
        match merged.last_mut() {
            Some(last) if last.date == base.date && base.start <= last.end => {
                last.end = last.end.max(base.end);
            }
            _ => merged.push(base),
        }
    }

    let mut slots: Vec<ComputedSlot> = Vec::new();
    for base in merged {
        let mut fragments = vec![base];
        for booking in booked.iter().filter(|i| i.date == base.date) {
            fragments = fragments
                .iter()
                .flat_map(|fragment| fragment.subtract(booking))
                .collect();
        }
        // subtract() never emits zero-length fragments; the filter guards
        // exact-boundary edge cases all the same.
        slots.extend(
            fragments
                .into_iter()
                .filter(|f| f.start < f.end)
                .map(ComputedSlot::from),
        );
    }

    slots.sort_by_key(|s| (s.date, s.start_time));
    debug!(
        venue = venue_id.value(),
        source = ?source,
        blocks = blocks.len(),
        bookings = booked.len(),
        slots = slots.len(),
        "resolved availability"
    );
    Ok(slots)
}

/// Legacy containment check, preserved for compatibility with pre-resolver
/// callers: true when a single available legacy block covers the whole
/// requested interval (`block.start <= start && end <= block.end`).
///
/// Not equivalent to the resolver at partial-overlap boundaries; new code
/// uses [`get_available_slots`].
pub async fn legacy_block_covers(
    repo: &dyn FullRepository,
    venue_id: VenueId,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> EngineResult<bool> {
    let requested = TimeInterval::new(date, start, end)?;
    let blocks = repo
        .find_availability_blocks(venue_id, date, date, crate::models::BlockSource::Legacy)
        .await?;

    Ok(blocks
        .iter()
        .any(|block| block.is_available && requested.within(&block.interval())))
}
