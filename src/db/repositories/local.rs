//! In-memory repository implementation.
//!
//! Used by unit/integration tests and local development. Beyond being a
//! fixture store, this backend is the reference semantics for the two
//! storage-level guarantees the engine relies on:
//!
//! - `insert_booking` re-checks the no-overlap invariant under the single
//!   write lock, so two racing creations for overlapping intervals cannot
//!   both succeed;
//! - `replace_materialized_window` swaps a venue's materialized window in
//!   one critical section, so readers never observe a half-written window.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;

use crate::api::{BookingId, PaymentId, QueueEntryId, VenueId};
use crate::db::repository::{
    AvailabilityRepository, BookingRepository, ErrorContext, NewBooking, PaymentRepository,
    RepositoryError, RepositoryResult, SyncQueueRepository,
};
use crate::models::{
    AvailabilityBlock, BlockSource, Booking, BookingStatus, Payment, PaymentStatus,
    RecurringTemplate, SyncQueueEntry, SyncStatus, TimeInterval, Venue,
};

#[derive(Default)]
struct Inner {
    venues: HashMap<VenueId, Venue>,
    blocks: Vec<AvailabilityBlock>,
    templates: Vec<RecurringTemplate>,
    bookings: HashMap<BookingId, Booking>,
    payments: HashMap<PaymentId, Payment>,
    queue: Vec<SyncQueueEntry>,
    next_booking_id: i64,
    next_queue_id: i64,
    fail_replace_window: bool,
    fail_queue_updates: bool,
}

/// In-memory local repository.
pub struct LocalRepository {
    inner: RwLock<Inner>,
}

impl LocalRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_booking_id: 1,
                next_queue_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Make the next `replace_materialized_window` calls fail, to exercise
    /// the materializer's retry path.
    pub fn set_fail_replace_window(&self, fail: bool) {
        self.inner.write().fail_replace_window = fail;
    }

    /// Make the next `mark_done`/`mark_failed` calls fail, to exercise the
    /// materializer's bookkeeping-failure path.
    pub fn set_fail_queue_updates(&self, fail: bool) {
        self.inner.write().fail_queue_updates = fail;
    }

    /// Snapshot the sync queue (test inspection).
    pub fn queue_entries(&self) -> Vec<SyncQueueEntry> {
        self.inner.read().queue.clone()
    }

    fn overlap_in(inner: &Inner, candidate: &NewBooking) -> bool {
        let interval = TimeInterval {
            date: candidate.date,
            start: candidate.start_time,
            end: candidate.end_time,
        };
        inner.bookings.values().any(|existing| {
            existing.venue_id == candidate.venue_id
                && existing.is_blocking()
                && existing.interval().overlaps(&interval)
        })
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn find_bookings_by_venue_and_date_range(
        &self,
        venue_id: VenueId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<Booking>> {
        let inner = self.inner.read();
        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| b.venue_id == venue_id && b.date >= from && b.date <= to)
            .cloned()
            .collect();
        bookings.sort_by_key(|b| (b.date, b.start_time, b.id));
        Ok(bookings)
    }

    async fn find_bookings_by_venue_and_date(
        &self,
        venue_id: VenueId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Booking>> {
        self.find_bookings_by_venue_and_date_range(venue_id, date, date)
            .await
    }

    async fn find_booking_by_id(&self, id: BookingId) -> RepositoryResult<Option<Booking>> {
        Ok(self.inner.read().bookings.get(&id).cloned())
    }

    async fn insert_booking(&self, booking: NewBooking) -> RepositoryResult<Booking> {
        let mut inner = self.inner.write();

        // Atomic check-and-insert: the overlap re-check and the insert share
        // one critical section.
        if booking.status.is_blocking() && Self::overlap_in(&inner, &booking) {
            return Err(RepositoryError::constraint_with_context(
                "booking interval overlaps an existing non-cancelled booking",
                ErrorContext::new("insert_booking")
                    .with_entity("booking")
                    .with_details(format!(
                        "venue={} date={} {}..{}",
                        booking.venue_id, booking.date, booking.start_time, booking.end_time
                    )),
            ));
        }

        let id = BookingId::new(inner.next_booking_id);
        inner.next_booking_id += 1;

        let row = Booking {
            id,
            venue_id: booking.venue_id,
            renter_id: booking.renter_id,
            date: booking.date,
            start_time: booking.start_time,
            end_time: booking.end_time,
            status: booking.status,
            recurring_type: booking.recurring_type,
            recurring_end_date: booking.recurring_end_date,
            parent_booking_id: booking.parent_booking_id,
            payment_id: booking.payment_id,
            price_cents: booking.price_cents,
        };
        inner.bookings.insert(id, row.clone());
        Ok(row)
    }

    async fn update_booking_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> RepositoryResult<Booking> {
        let mut inner = self.inner.write();
        let booking = inner.bookings.get_mut(&id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "booking does not exist",
                ErrorContext::new("update_booking_status")
                    .with_entity("booking")
                    .with_entity_id(id),
            )
        })?;
        booking.status = status;
        Ok(booking.clone())
    }
}

#[async_trait]
impl AvailabilityRepository for LocalRepository {
    async fn find_venue_by_id(&self, venue_id: VenueId) -> RepositoryResult<Option<Venue>> {
        Ok(self.inner.read().venues.get(&venue_id).cloned())
    }

    async fn find_availability_blocks(
        &self,
        venue_id: VenueId,
        from: NaiveDate,
        to: NaiveDate,
        source: BlockSource,
    ) -> RepositoryResult<Vec<AvailabilityBlock>> {
        let inner = self.inner.read();
        let mut blocks: Vec<AvailabilityBlock> = inner
            .blocks
            .iter()
            .filter(|b| {
                b.venue_id == venue_id && b.source == source && b.date >= from && b.date <= to
            })
            .cloned()
            .collect();
        blocks.sort_by_key(|b| (b.date, b.start_time));
        Ok(blocks)
    }

    async fn find_recurring_templates(
        &self,
        venue_id: VenueId,
    ) -> RepositoryResult<Vec<RecurringTemplate>> {
        Ok(self
            .inner
            .read()
            .templates
            .iter()
            .filter(|t| t.venue_id == venue_id)
            .cloned()
            .collect())
    }

    async fn replace_materialized_window(
        &self,
        venue_id: VenueId,
        from: NaiveDate,
        to: NaiveDate,
        rows: Vec<AvailabilityBlock>,
    ) -> RepositoryResult<usize> {
        let mut inner = self.inner.write();

        if inner.fail_replace_window {
            return Err(RepositoryError::query_with_context(
                "simulated storage failure",
                ErrorContext::new("replace_materialized_window")
                    .with_entity("availability_block")
                    .with_entity_id(venue_id)
                    .retryable(),
            ));
        }

        // Single critical section: drop the old window, install the new one.
        inner.blocks.retain(|b| {
            !(b.venue_id == venue_id
                && b.source == BlockSource::Template
                && b.date >= from
                && b.date <= to)
        });
        let written = rows.len();
        inner.blocks.extend(rows);
        Ok(written)
    }

    async fn insert_venue(&self, venue: Venue) -> RepositoryResult<()> {
        self.inner.write().venues.insert(venue.id, venue);
        Ok(())
    }

    async fn insert_availability_block(&self, block: AvailabilityBlock) -> RepositoryResult<()> {
        self.inner.write().blocks.push(block);
        Ok(())
    }

    async fn insert_recurring_template(
        &self,
        template: RecurringTemplate,
    ) -> RepositoryResult<()> {
        self.inner.write().templates.push(template);
        Ok(())
    }
}

#[async_trait]
impl SyncQueueRepository for LocalRepository {
    async fn enqueue_sync(&self, venue_id: VenueId) -> RepositoryResult<SyncQueueEntry> {
        let mut inner = self.inner.write();
        let id = QueueEntryId::new(inner.next_queue_id);
        inner.next_queue_id += 1;
        let entry = SyncQueueEntry {
            id,
            venue_id,
            requested_at: Utc::now(),
            status: SyncStatus::Pending,
            last_error: None,
        };
        inner.queue.push(entry.clone());
        Ok(entry)
    }

    async fn claim_pending_entries(&self, limit: usize) -> RepositoryResult<Vec<SyncQueueEntry>> {
        let mut inner = self.inner.write();

        let busy: Vec<VenueId> = inner
            .queue
            .iter()
            .filter(|e| e.status == SyncStatus::Processing)
            .map(|e| e.venue_id)
            .collect();

        // Oldest pending entry per venue, skipping venues already in flight.
        let mut candidates: Vec<(QueueEntryId, VenueId, chrono::DateTime<Utc>)> = Vec::new();
        for entry in inner.queue.iter().filter(|e| {
            e.status == SyncStatus::Pending && !busy.contains(&e.venue_id)
        }) {
            match candidates.iter_mut().find(|(_, v, _)| *v == entry.venue_id) {
                Some(existing) if entry.requested_at < existing.2 => {
                    *existing = (entry.id, entry.venue_id, entry.requested_at);
                }
                Some(_) => {}
                None => candidates.push((entry.id, entry.venue_id, entry.requested_at)),
            }
        }
        candidates.sort_by_key(|(_, venue_id, requested_at)| (*requested_at, *venue_id));
        candidates.truncate(limit);

        let mut claimed = Vec::with_capacity(candidates.len());
        for (id, venue_id, _) in &candidates {
            for entry in inner.queue.iter_mut() {
                if entry.id == *id {
                    entry.status = SyncStatus::Processing;
                    claimed.push(entry.clone());
                } else if entry.venue_id == *venue_id && entry.status == SyncStatus::Pending {
                    // Duplicate requests for the claimed venue are covered by
                    // the full-overwrite run; collapse them.
                    entry.status = SyncStatus::Done;
                }
            }
        }
        Ok(claimed)
    }

    async fn mark_done(&self, id: QueueEntryId) -> RepositoryResult<()> {
        self.set_queue_status(id, SyncStatus::Done, None)
    }

    async fn mark_failed(&self, id: QueueEntryId, error: &str) -> RepositoryResult<()> {
        self.set_queue_status(id, SyncStatus::Failed, Some(error.to_string()))
    }
}

impl LocalRepository {
    fn set_queue_status(
        &self,
        id: QueueEntryId,
        status: SyncStatus,
        last_error: Option<String>,
    ) -> RepositoryResult<()> {
        let mut inner = self.inner.write();
        if inner.fail_queue_updates {
            return Err(RepositoryError::query_with_context(
                "simulated storage failure",
                ErrorContext::new("set_queue_status")
                    .with_entity("sync_queue_entry")
                    .with_entity_id(id)
                    .retryable(),
            ));
        }
        let entry = inner
            .queue
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    "queue entry does not exist",
                    ErrorContext::new("set_queue_status")
                        .with_entity("sync_queue_entry")
                        .with_entity_id(id),
                )
            })?;
        entry.status = status;
        entry.last_error = last_error;
        Ok(())
    }
}

#[async_trait]
impl PaymentRepository for LocalRepository {
    async fn find_payment_by_id(&self, id: PaymentId) -> RepositoryResult<Option<Payment>> {
        Ok(self.inner.read().payments.get(&id).cloned())
    }

    async fn insert_payment(&self, payment: Payment) -> RepositoryResult<()> {
        self.inner.write().payments.insert(payment.id, payment);
        Ok(())
    }

    async fn mark_payment_refunded(&self, id: PaymentId) -> RepositoryResult<()> {
        let mut inner = self.inner.write();
        let payment = inner.payments.get_mut(&id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "payment does not exist",
                ErrorContext::new("mark_payment_refunded")
                    .with_entity("payment")
                    .with_entity_id(id),
            )
        })?;
        payment.status = PaymentStatus::Refunded;
        Ok(())
    }
}
